//! Metrics collection and exposition.
//!
//! # Metrics
//! - `i18n_navigations_total` (counter): navigations handled
//! - `i18n_redirects_total` (counter): redirects by status and reason
//! - `i18n_not_found_total` (counter): paths without a locale
//!
//! # Design Decisions
//! - Prometheus exporter with its own HTTP listener
//! - Labels limited to status code and redirect reason

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_navigation() {
    metrics::counter!("i18n_navigations_total").increment(1);
}

pub fn record_redirect(status: u16, reason: &'static str) {
    metrics::counter!(
        "i18n_redirects_total",
        "status" => status.to_string(),
        "reason" => reason
    )
    .increment(1);
}

pub fn record_not_found() {
    metrics::counter!("i18n_not_found_total").increment(1);
}
