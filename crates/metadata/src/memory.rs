use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::canonical::to_canonical_json;
use crate::store::MetadataStore;
use crate::{MetadataDocument, Result, StoreError};

/// In-memory metadata store for testing.
///
/// Holds the stored text rather than a parsed document so tests can seed
/// malformed content, and counts writes so tests can assert that nothing
/// was saved.
#[derive(Clone, Default)]
pub struct InMemoryMetadataStore {
    contents: Arc<RwLock<Option<String>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryMetadataStore {
    /// Creates an empty store, as if the file did not exist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `doc` in canonical form.
    pub fn with_document(doc: &MetadataDocument) -> Result<Self> {
        Ok(Self::with_raw(to_canonical_json(doc)?))
    }

    /// Creates a store holding arbitrary text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(RwLock::new(Some(raw.into()))),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the stored text, if any.
    pub async fn raw(&self) -> Option<String> {
        self.contents.read().await.clone()
    }

    /// Number of successful `save` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Removes the stored content.
    pub async fn clear(&self) {
        *self.contents.write().await = None;
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn read_raw(&self) -> Result<String> {
        self.contents
            .read()
            .await
            .clone()
            .ok_or_else(|| StoreError::NotFound(self.location()))
    }

    async fn save(&self, doc: &MetadataDocument) -> Result<()> {
        let json = to_canonical_json(doc)?;
        *self.contents.write().await = Some(json);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
