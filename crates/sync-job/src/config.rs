//! Sync job configuration.

use std::path::PathBuf;
use std::time::Duration;

use metadata::DEFAULT_STORE_PATH;

/// Upstream endpoint returning the raw `[{state, city}]` list.
pub const DEFAULT_SOURCE_URL: &str =
    "https://wyemh3eowg.execute-api.ap-south-1.amazonaws.com/cities";

/// Upper bound on the single upstream request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the job fetches from and writes to.
///
/// The job has no external tunables; `Default` carries the production
/// values and tests construct their own.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub source_url: String,
    pub store_path: PathBuf,
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
