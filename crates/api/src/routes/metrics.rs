//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics: `/meta-data` request counters in Prometheus text format.
///
/// No recorder runs upkeep in the background, so it happens on scrape.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.run_upkeep();
    let body = handle.render();
    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body)
}
