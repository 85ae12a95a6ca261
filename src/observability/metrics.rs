//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wishes_requests_total` (counter): requests by method, route, status
//! - `wishes_request_duration_seconds` (histogram): latency distribution
//! - `wishes_rate_limited_total` (counter): rejected by the limiter, by path
//! - `wishes_store_errors_total` (counter): failed database calls by table, op
//!
//! Recording is a no-op until a recorder is installed, so tests and runs with
//! metrics disabled pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let status = status.to_string();
    counter!(
        "wishes_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "wishes_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(path: &str) {
    counter!("wishes_rate_limited_total", "path" => path.to_string()).increment(1);
}

pub fn record_store_error(table: &str, op: &'static str) {
    counter!("wishes_store_errors_total", "table" => table.to_string(), "op" => op).increment(1);
}
