//! Metrics collection and exposition.
//!
//! # Metrics
//! - `churn_requests_total` (counter): `/predict` responses by status
//! - `churn_predictions_total` (counter): successful predictions by label
//! - `churn_inference_latency_seconds` (histogram): model scoring time
//! - `churn_persistence_writes_total` (counter): log writes by outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(status: u16) {
    ::metrics::counter!("churn_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_prediction(churn_label: bool, latency: Duration) {
    let label = if churn_label { "churn" } else { "retain" };
    ::metrics::counter!("churn_predictions_total", "label" => label).increment(1);
    ::metrics::histogram!("churn_inference_latency_seconds").record(latency.as_secs_f64());
}

pub fn record_persistence(outcome: &'static str) {
    ::metrics::counter!("churn_persistence_writes_total", "outcome" => outcome).increment(1);
}
