use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing the metadata store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has never been written.
    #[error("Metadata store not found: {0}")]
    NotFound(String),

    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored content is not a valid metadata document.
    #[error("Malformed metadata document: {0}")]
    Malformed(#[source] serde_json::Error),

    /// A document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl StoreError {
    /// Returns true when the store is missing or holds unparsable content.
    ///
    /// The sync job treats these as "nothing stored yet"; every other error
    /// is fatal.
    pub fn is_unreadable(&self) -> bool {
        match self {
            StoreError::NotFound(_) | StoreError::Malformed(_) => true,
            StoreError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            StoreError::Serialization(_) => false,
        }
    }
}

/// Result type for metadata store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
