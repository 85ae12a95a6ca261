//! Database client subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → guestbook service
//!     → query.rs (fluent builder: from / select / insert / eq / single)
//!     → Store trait
//!         → postgrest.rs (hosted REST database over reqwest)
//!         → memory.rs (in-process tables)
//!     → rows back as JSON objects
//! ```
//!
//! # Design Decisions
//! - The database owns persistence and consistency; this layer only shapes
//!   requests and decodes rows
//! - Builders validate cardinality (`single`) on the client side so both
//!   backends behave the same
//! - No retries and no transactions

pub mod memory;
pub mod postgrest;
pub mod query;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{DatabaseConfig, StoreBackend};

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use query::{Database, Filter, InsertQuery, Returning, SelectQuery};
pub use types::{Row, StoreError, StoreResult};

/// Backend seam for table queries.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the rows of `query.table` matching every filter.
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<Row>>;

    /// Insert rows. Returns the inserted rows when representation was requested,
    /// otherwise an empty list.
    async fn insert(&self, query: &InsertQuery) -> StoreResult<Vec<Row>>;
}

/// Build the configured backend.
pub fn connect(config: &DatabaseConfig) -> StoreResult<Database> {
    let database = match config.backend {
        StoreBackend::Postgrest => {
            let store = PostgrestStore::new(&config.url, &config.api_key)?;
            tracing::info!(url = %config.url, "Using PostgREST store");
            Database::new(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            Database::new(Arc::new(MemoryStore::new()))
        }
    };
    Ok(database)
}
