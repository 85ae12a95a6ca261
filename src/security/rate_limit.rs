//! Fixed-window rate limiting keyed by client identity.
//!
//! A client's window opens on its first hit and lasts `window`. Up to `limit`
//! hits pass inside a window; the rest get 429 until the window expires.
//! Time comes from an injectable [`Clock`] so tests can step it by hand.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::observability::metrics;

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("manual clock mutex poisoned");
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().expect("manual clock mutex poisoned")
    }
}

/// Hits recorded for one client.
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Per-client fixed-window counter store.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    limit: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window,
            clock,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_requests,
            Duration::from_secs(config.window_secs),
            Arc::new(SystemClock),
        )
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Record a hit for `key` and decide whether it may pass.
    pub fn check(&self, key: &str) -> Decision {
        let now = self.clock.now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.hits = 0;
        }

        entry.hits = entry.hits.saturating_add(1);
        if entry.hits <= self.limit {
            Decision::Allowed {
                remaining: self.limit - entry.hits,
            }
        } else {
            let retry_after = self
                .window
                .saturating_sub(now.saturating_duration_since(entry.started));
            Decision::Limited { retry_after }
        }
    }

    /// Drop windows that have expired. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.windows.retain(|_, w| {
            let live = now.saturating_duration_since(w.started) < self.window;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    /// Number of clients currently tracked.
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }
}

/// Identify the client by peer IP, or `"unknown"` without connection info.
fn client_key(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware function for per-client rate limiting.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&request);

    match limiter.check(&key) {
        Decision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limiter.limit()));
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after } => {
            tracing::warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
            metrics::record_rate_limited(request.uri().path());
            let mut response = ApiError::RateLimited.into_response();
            let secs = retry_after.as_secs_f64().ceil() as u64;
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
            response
        }
    }
}

/// Periodically purge expired windows until shutdown.
pub async fn run_sweeper(
    limiter: Arc<RateLimiter>,
    every: Duration,
    mut shutdown: tokio::sync::broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = limiter.sweep();
                if removed > 0 {
                    tracing::debug!(removed, tracked = limiter.tracked(), "Swept rate limit windows");
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}
