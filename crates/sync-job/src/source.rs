//! Upstream sources of raw city records.

use std::time::Duration;

use async_trait::async_trait;
use metadata::CityRecord;
use reqwest::Client;

use crate::error::{Result, SyncError};
use crate::schema::parse_records;

/// A source of validated city records.
#[async_trait]
pub trait CitySource: Send + Sync {
    /// Fetches the full record list in a single attempt.
    async fn fetch(&self) -> Result<Vec<CityRecord>>;

    /// URI recorded as the document's `source`.
    fn url(&self) -> &str;
}

/// Fetches records with one HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpCitySource {
    url: String,
    client: Client,
}

impl HttpCitySource {
    /// Creates a source whose request is bounded by `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SyncError::transport)?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl CitySource for HttpCitySource {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<CityRecord>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(SyncError::transport)?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "upstream returned an error status");
            return Err(SyncError::status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(SyncError::transport)?;
        let records = parse_records(&body)?;
        tracing::debug!(records = records.len(), bytes = body.len(), "upstream body validated");
        Ok(records)
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Serves a fixed record list; used for tests and local seeding.
#[derive(Debug, Clone)]
pub struct StaticCitySource {
    url: String,
    records: Vec<CityRecord>,
}

impl StaticCitySource {
    pub fn new(url: impl Into<String>, records: Vec<CityRecord>) -> Self {
        Self {
            url: url.into(),
            records,
        }
    }
}

#[async_trait]
impl CitySource for StaticCitySource {
    async fn fetch(&self) -> Result<Vec<CityRecord>> {
        Ok(self.records.clone())
    }

    fn url(&self) -> &str {
        &self.url
    }
}
