//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_upstream_attempts_total` (counter): attempts by service, endpoint, outcome
//! - `gateway_upstream_attempt_duration_seconds` (histogram): attempt latency
//! - `gateway_failover_total` (counter): failover runs by service and result
//! - `gateway_endpoint_cooldowns_total` (counter): cooldowns started per endpoint
//!
//! Endpoint labels are hostnames, never full URLs, so API keys embedded in
//! provider URLs do not leak into the scrape output.

use ::metrics::Label;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus recorder with its own HTTP listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, route: &str, status: u16, elapsed: Duration) {
    let labels = vec![
        Label::new("method", method.to_string()),
        Label::new("route", route.to_string()),
        Label::new("status", status.to_string()),
    ];
    ::metrics::counter!("gateway_requests_total", labels.clone()).increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", labels).record(elapsed.as_secs_f64());
}

pub fn record_upstream_attempt(service: &str, endpoint: &str, outcome: &str, elapsed: Duration) {
    let labels = vec![
        Label::new("service", service.to_string()),
        Label::new("endpoint", endpoint.to_string()),
        Label::new("outcome", outcome.to_string()),
    ];
    ::metrics::counter!("gateway_upstream_attempts_total", labels.clone()).increment(1);
    ::metrics::histogram!("gateway_upstream_attempt_duration_seconds", labels)
        .record(elapsed.as_secs_f64());
}

pub fn record_failover(service: &str, result: &str) {
    ::metrics::counter!(
        "gateway_failover_total",
        "service" => service.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}

pub fn record_cooldown(service: &str, endpoint: &str) {
    ::metrics::counter!(
        "gateway_endpoint_cooldowns_total",
        "service" => service.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .increment(1);
}
