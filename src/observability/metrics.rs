//! Metrics collection and exposition.
//!
//! # Metrics
//! - `crime_alert_bootstrap_total` (counter): bootstrap attempts by outcome
//! - `crime_alert_wallet_requests_total` (counter): wallet requests by method, result
//! - `crime_alert_account_changes_total` (counter): account changes by resulting state
//! - `crime_alert_session_connected` (gauge): 1=connected, 0=disconnected

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Needs a running Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_bootstrap(outcome: &'static str) {
    metrics::counter!("crime_alert_bootstrap_total", "outcome" => outcome).increment(1);
    if outcome == "connected" {
        metrics::gauge!("crime_alert_session_connected").set(1.0);
    }
}

pub fn record_wallet_request(method: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!("crime_alert_wallet_requests_total", "method" => method, "result" => result)
        .increment(1);
}

pub fn record_account_change(connected: bool) {
    let state = if connected { "connected" } else { "disconnected" };
    metrics::counter!("crime_alert_account_changes_total", "state" => state).increment(1);
    metrics::gauge!("crime_alert_session_connected").set(if connected { 1.0 } else { 0.0 });
}
