//! Metrics collection and exposition.
//!
//! # Metrics
//! - `method_override_total` (counter): applied overrides by `from` and `to`

use std::net::SocketAddr;

use axum::http::Method;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_override(from: &Method, to: &Method) {
    metrics::counter!(
        "method_override_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}
