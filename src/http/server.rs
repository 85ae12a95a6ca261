//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, security headers,
//!   body limit, panic recovery, rate limiting)
//! - Bind server to listener and serve until shutdown
//! - Record per-route metrics

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::{ApiError, INTERNAL_ERROR};
use crate::guestbook::GuestbookService;
use crate::http::handlers::{guest, health, wish};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::security::headers::{cors_layer, with_security_headers};
use crate::security::rate_limit::{rate_limit_middleware, run_sweeper, RateLimiter};
use crate::store::Database;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub app_name: Arc<str>,
    pub guestbook: GuestbookService,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid guest invite URL: {0}")]
    InviteUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the wishes API.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    limiter: Option<Arc<RateLimiter>>,
}

impl HttpServer {
    /// Create a new HTTP server backed by `db`.
    pub fn new(config: AppConfig, db: Database) -> Result<Self, ServerError> {
        let limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::from_config(&config.rate_limit)));
        Self::with_limiter(config, db, limiter)
    }

    /// Like [`HttpServer::new`] with a caller-supplied limiter (e.g. one
    /// driven by a manual clock).
    pub fn with_limiter(
        config: AppConfig,
        db: Database,
        limiter: Option<Arc<RateLimiter>>,
    ) -> Result<Self, ServerError> {
        let guestbook = GuestbookService::new(db, &config.database, &config.guest)?;
        let state = AppState {
            app_name: Arc::from(config.app.name.as_str()),
            guestbook,
        };

        let router = Self::build_router(&config, state, limiter.clone());
        Ok(Self {
            router,
            config,
            limiter,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &AppConfig,
        state: AppState,
        limiter: Option<Arc<RateLimiter>>,
    ) -> Router {
        let mut submit_wish = post(wish::submit_wish);
        if let Some(limiter) = limiter {
            submit_wish =
                submit_wish.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        let router = Router::new()
            .route("/", get(health::health))
            .route("/wish", submit_wish.get(wish::list_wishes))
            .route("/admin/guest", post(guest::create_guest))
            .route("/guest/{slug}", get(guest::get_guest))
            .layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(cors_layer(&config.cors));

        let router = if config.security.enable_headers {
            with_security_headers(router)
        } else {
            router
        };

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if let Some(limiter) = self.limiter.clone() {
            let every = Duration::from_secs(self.config.rate_limit.sweep_interval_secs);
            tokio::spawn(run_sweeper(limiter, every, shutdown.resubscribe()));
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), &route, start);
    response
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::Internal(INTERNAL_ERROR.to_string()).into_response()
}
