//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use metadata::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The metadata store could not be read or parsed.
    StoreUnreadable(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::StoreUnreadable(err) => {
                tracing::error!(error = %err, "failed to read meta-data");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read meta-data".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::StoreUnreadable(err)
    }
}
