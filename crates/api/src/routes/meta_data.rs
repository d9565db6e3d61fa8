//! Metadata document endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use metadata::{MetadataStore, MetadataStoreExt};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: MetadataStore> {
    pub store: S,
}

/// GET /meta-data: the stored document, re-read on every request.
///
/// Any JSON the store holds is served as-is, so key order, extra keys and
/// the stored `lastSyncedAt` text all pass through unchanged.
#[tracing::instrument(skip(state), fields(store = %state.store.location()))]
pub async fn get<S: MetadataStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.store.load_value().await {
        Ok(doc) => {
            metrics::counter!("metadata_requests_total", "outcome" => "ok").increment(1);
            Ok(Json(doc))
        }
        Err(err) => {
            metrics::counter!("metadata_requests_total", "outcome" => "store_unreadable")
                .increment(1);
            Err(ApiError::from(err))
        }
    }
}
