//! Metrics collection and exposition.
//!
//! # Metrics
//! - `configd_store_mutations_total` (counter): store mutations by entity
//!   kind, operation, and outcome
//! - `configd_api_requests_total` (counter): API requests by method, status
//! - `configd_api_request_duration_seconds` (histogram): API latency
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Mutation outcomes labeled so conflict rates are visible per kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::model::EntityKind;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of a store mutation attempt.
pub fn record_mutation(kind: EntityKind, op: &'static str, outcome: &'static str) {
    metrics::counter!(
        "configd_store_mutations_total",
        "kind" => kind.as_str(),
        "op" => op,
        "outcome" => outcome,
    )
    .increment(1);
}

/// Record a completed API request with its latency.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "configd_api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    metrics::histogram!(
        "configd_api_request_duration_seconds",
        "method" => method.to_string(),
    )
    .record(start.elapsed().as_secs_f64());
}
