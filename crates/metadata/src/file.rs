//! Metadata store backed by a JSON file on the local filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::canonical::to_canonical_json;
use crate::store::MetadataStore;
use crate::{MetadataDocument, Result, StoreError};

/// Default file name, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "meta-data.json";

/// File-backed metadata store.
///
/// Writes go to a sibling `.tmp` file which is fsynced and then renamed over
/// the target, so readers never observe a partially written document.
#[derive(Debug, Clone)]
pub struct FileMetadataStore {
    path: PathBuf,
}

impl FileMetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Default for FileMetadataStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_PATH)
    }
}

#[async_trait]
impl MetadataStore for FileMetadataStore {
    async fn read_raw(&self) -> Result<String> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(self.path.display().to_string()))
            }
            Err(e) => Err(self.io_error(&self.path, e)),
        }
    }

    #[tracing::instrument(skip(self, doc), fields(path = %self.path.display()))]
    async fn save(&self, doc: &MetadataDocument) -> Result<()> {
        let json = to_canonical_json(doc)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(parent, e))?;
        }

        let tmp_path = self.tmp_path();
        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| self.io_error(&tmp_path, e))?;

        let written = match file.write_all(json.as_bytes()).await {
            Ok(()) => file.sync_all().await,
            Err(e) => Err(e),
        };
        drop(file);

        // From here on the temporary file exists and must not outlive a failure.
        let result = match written {
            Ok(()) => fs::rename(&tmp_path, &self.path)
                .await
                .map_err(|e| self.io_error(&self.path, e)),
            Err(e) => Err(self.io_error(&tmp_path, e)),
        };
        if let Err(err) = result {
            if let Err(e) = fs::remove_file(&tmp_path).await {
                tracing::warn!(tmp = %tmp_path.display(), error = %e, "failed to remove temporary file");
            }
            return Err(err);
        }

        tracing::debug!(bytes = json.len(), "metadata written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
