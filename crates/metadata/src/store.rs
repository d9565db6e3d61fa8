use async_trait::async_trait;

use crate::{DocumentContent, MetadataDocument, Result, StoreError};

/// Storage for the single metadata document.
///
/// Implementations must make `save` all-or-nothing: a concurrent read
/// sees either the previous document or the new one, never a mix.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Returns the stored text as written.
    ///
    /// Fails with `NotFound` if nothing was ever written.
    async fn read_raw(&self) -> Result<String>;

    /// Replaces the stored document with `doc` in canonical form.
    async fn save(&self, doc: &MetadataDocument) -> Result<()>;

    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}

/// Extension trait providing the typed views of the stored text.
#[async_trait]
pub trait MetadataStoreExt: MetadataStore {
    /// Parses the stored text as a full document, timestamp included.
    async fn load(&self) -> Result<MetadataDocument> {
        let raw = self.read_raw().await?;
        serde_json::from_str(&raw).map_err(StoreError::Malformed)
    }

    /// Parses the stored text as arbitrary JSON, keys and values untouched.
    async fn load_value(&self) -> Result<serde_json::Value> {
        let raw = self.read_raw().await?;
        serde_json::from_str(&raw).map_err(StoreError::Malformed)
    }

    /// Reads only `{source, states}`, substituting the empty content for
    /// `source` when the store is missing or unparsable.
    ///
    /// Other failures (e.g. permission errors) are returned.
    async fn load_content_or_empty(&self, source: &str) -> Result<DocumentContent> {
        let parsed = match self.read_raw().await {
            Ok(raw) => serde_json::from_str(&raw).map_err(StoreError::Malformed),
            Err(err) => Err(err),
        };

        match parsed {
            Ok(content) => Ok(content),
            Err(err) if err.is_unreadable() => {
                if matches!(err, StoreError::Malformed(_)) {
                    tracing::warn!(
                        store = %self.location(),
                        error = %err,
                        "stored metadata is unparsable, treating as empty"
                    );
                } else {
                    tracing::info!(store = %self.location(), "no stored metadata yet");
                }
                Ok(DocumentContent::empty(source))
            }
            Err(err) => Err(err),
        }
    }
}

// Blanket implementation for all MetadataStore implementations
impl<T: MetadataStore + ?Sized> MetadataStoreExt for T {}
