//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): by service, method, route, status
//! - `http_request_duration_seconds` (histogram): by service, route
//! - `upstream_requests_total` (counter): web → API calls by outcome
//! - `db_queries_total` (counter): status queries by store and outcome
//!
//! # Design Decisions
//! - Route labels are registered route names, never raw paths, so an
//!   unmatched-path scan cannot blow up label cardinality
//! - Recording is a no-op until an exporter is installed

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::{Method, StatusCode};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter, serving scrapes on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(
    service: &'static str,
    method: &Method,
    route: &'static str,
    status: StatusCode,
    start: Instant,
) {
    counter!(
        "http_requests_total",
        "service" => service,
        "method" => method.to_string(),
        "route" => route,
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "service" => service,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a call to the API service.
pub fn record_upstream(outcome: &'static str, start: Instant) {
    counter!("upstream_requests_total", "outcome" => outcome).increment(1);
    histogram!("upstream_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a status query.
pub fn record_db_query(store: &'static str, outcome: &'static str) {
    counter!("db_queries_total", "store" => store, "outcome" => outcome).increment(1);
}
