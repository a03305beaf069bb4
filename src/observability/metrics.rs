//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, route, status
//! - `router_request_duration_seconds` (histogram): dispatch latency
//! - `router_reloads_total` (counter): route table reloads by outcome
//! - `router_routes` (gauge): routes in the live table
//!
//! # Design Decisions
//! - Route label is the route name, never the raw path (bounded cardinality)
//! - Exposition is optional; recording without a recorder costs nothing

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Serve Prometheus metrics on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one dispatched request. `route` is the matched route name, or
/// `"none"` when nothing matched.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "router_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// `outcome` is `"applied"` or `"rejected"`.
pub fn record_reload(outcome: &'static str) {
    counter!("router_reloads_total", "outcome" => outcome).increment(1);
}

pub fn set_route_count(count: usize) {
    gauge!("router_routes").set(count as f64);
}
