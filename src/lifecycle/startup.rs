//! Startup orchestration.
//!
//! Order: logging → metrics → store → HTTP server → listener → serve.
//! Any startup error is fatal.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::store::{self, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bring the service up and serve until SIGINT/SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wedding-wishes starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let db = store::connect(&config.database)?;

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    let port = listener.local_addr()?.port();

    tracing::info!(
        rate_limit = config.rate_limit.enabled,
        window_secs = config.rate_limit.window_secs,
        max_requests = config.rate_limit.max_requests,
        "Configuration loaded"
    );
    tracing::info!("{} REST API RUN at PORT {}", config.app.name, port);

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, db)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
