//! Wedding wishes REST API.
//!
//! A thin JSON façade over a hosted database: guestbook wishes and
//! slug-based guest invites.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http::server (request id, trace, CORS, headers, body limit)
//!                 │
//!                 ├─ security::rate_limit (POST /wish only)
//!                 ▼
//!              http::handlers ──▶ guestbook::service ──▶ store::Database
//!                                                          │
//!                                          ┌───────────────┴──────────┐
//!                                  store::postgrest              store::memory
//!                                  (hosted REST DB)              (in-process)
//! ```

pub mod config;
pub mod error;
pub mod guestbook;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod store;

pub use config::AppConfig;
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
