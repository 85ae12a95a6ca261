//! Guestbook domain: wishes and guest invites.
//!
//! # Data Flow
//! ```text
//! POST /wish        → types.rs (validate, lowercase) → service.rs (lookup, insert)
//! GET  /wish        → service.rs (select all)
//! POST /admin/guest → slug.rs (derive slug) → service.rs (insert, invite URL)
//! GET  /guest/{slug}→ service.rs (single-row lookup)
//! ```

pub mod service;
pub mod slug;
pub mod types;

pub use service::GuestbookService;
pub use types::{
    Guest, GuestInput, GuestInvite, GuestName, GuestbookError, NewWish, WishInput,
};
