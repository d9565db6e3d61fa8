//! Offline job that refreshes the state/city metadata store.
//!
//! A run fetches the raw `[{state, city}]` list from the upstream source,
//! rejects it unless every record is well formed, normalizes it, and
//! replaces the stored document only when `{source, states}` changed.

pub mod config;
pub mod error;
pub mod job;
pub mod schema;
pub mod source;

pub use config::{DEFAULT_SOURCE_URL, SyncConfig};
pub use error::{Result, SyncError};
pub use job::{SyncJob, SyncOutcome};
pub use schema::SchemaError;
pub use source::{CitySource, HttpCitySource, StaticCitySource};

use metadata::FileMetadataStore;

/// Runs one sync against the HTTP source and file store named by `config`.
pub async fn run(config: &SyncConfig) -> Result<SyncOutcome> {
    let source = HttpCitySource::new(config.source_url.clone(), config.request_timeout)?;
    let store = FileMetadataStore::new(config.store_path.clone());
    SyncJob::new(source, store).run().await
}
