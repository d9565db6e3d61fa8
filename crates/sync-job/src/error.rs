//! Sync job error types.

use metadata::StoreError;
use thiserror::Error;

use crate::schema::SchemaError;

/// Errors that abort a sync run. None of them leave a partial write behind.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The upstream request failed or returned a non-success status.
    #[error("Remote source unavailable: {reason}")]
    RemoteUnavailable {
        /// HTTP status, when the server answered at all.
        status: Option<u16>,
        reason: String,
    },

    /// The upstream body does not have the expected record shape.
    #[error("Unexpected API shape: {0}")]
    SchemaMismatch(#[from] SchemaError),

    /// Reading or writing the local store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        SyncError::RemoteUnavailable {
            status: None,
            reason: err.to_string(),
        }
    }

    pub(crate) fn status(status: u16) -> Self {
        SyncError::RemoteUnavailable {
            status: Some(status),
            reason: format!("upstream responded {status}"),
        }
    }

    /// Short name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncError::RemoteUnavailable { .. } => "remote_unavailable",
            SyncError::SchemaMismatch(_) => "schema_mismatch",
            SyncError::Store(_) => "store_error",
        }
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
