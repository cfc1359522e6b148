//! Metrics collection and exposition.
//!
//! # Metrics
//! - `storefront_requests_total` (counter): handled requests by route, status
//! - `storefront_rate_limited_total` (counter): rejected requests by route class
//! - `storefront_upstream_retries_total` (counter): 429 retries against Shopify
//! - `storefront_upstream_exhausted_total` (counter): calls that ran out of retries

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16) {
    counter!(
        "storefront_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_rate_limited(route_class: &'static str) {
    counter!("storefront_rate_limited_total", "class" => route_class).increment(1);
}

pub fn record_upstream_retry() {
    counter!("storefront_upstream_retries_total").increment(1);
}

pub fn record_upstream_exhausted() {
    counter!("storefront_upstream_exhausted_total").increment(1);
}
