//! Metrics collection and exposition.
//!
//! # Metrics
//! - `user_agent_resolutions_total` (counter): resolutions by source
//!   (`direct` or `proxy_header`)
//! - `http_requests_total` (counter): responses by final status code,
//!   including timeouts produced by outer layers
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus endpoint is optional and off by default

use std::net::SocketAddr;

use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one user-agent resolution.
pub fn record_resolution(source: &'static str) {
    ::metrics::counter!("user_agent_resolutions_total", "source" => source).increment(1);
}

/// Count one handled request.
pub fn record_request(status: u16) {
    ::metrics::counter!("http_requests_total", "status" => status.to_string()).increment(1);
}

/// Response mapper counting the status actually sent, for
/// `axum::middleware::map_response`.
pub async fn record_status(response: Response) -> Response {
    record_request(response.status().as_u16());
    response
}
