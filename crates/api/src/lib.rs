//! Read-only HTTP server for the state/city metadata store.
//!
//! Serves the stored document at `/meta-data`, re-reading it on every
//! request, plus a liveness probe and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metadata::{FileMetadataStore, MetadataStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::meta_data::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: MetadataStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/healthz", get(routes::health::check))
        .route("/meta-data", get(routes::meta_data::get::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state backed by the file named in `config`.
pub fn create_default_state(config: &Config) -> Arc<AppState<FileMetadataStore>> {
    Arc::new(AppState {
        store: FileMetadataStore::new(config.store_path.clone()),
    })
}
