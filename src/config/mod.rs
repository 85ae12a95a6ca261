//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (APP_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (APP_PORT, APP_NAME, SUPABASE_URL, SUPABASE_KEY)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared by value/Arc with all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    AppConfig, CorsConfig, DatabaseConfig, GuestConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RateLimitConfig, SecurityConfig, StoreBackend,
};
