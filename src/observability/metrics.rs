//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): total requests by method, status
//! - `relay_request_duration_seconds` (histogram): latency distribution
//! - `relay_upstream_retries_total` (counter): retries by reason

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed inbound request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "relay_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Record one upstream retry, labeled by what made the attempt transient.
pub fn record_retry(reason: &'static str) {
    counter!("relay_upstream_retries_total", "reason" => reason).increment(1);
}
