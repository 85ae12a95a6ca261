//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (CORS preflight / origin check)
//!     → body limit (reject oversized JSON)
//!     → rate_limit.rs (per-client window, POST /wish only)
//!     → Pass to handler
//! Outgoing response:
//!     → headers.rs (hardening headers)
//! ```
//!
//! # Design Decisions
//! - No authentication; CORS is the whole access policy
//! - Limiter state is an explicit component with an injectable clock

pub mod headers;
pub mod rate_limit;
