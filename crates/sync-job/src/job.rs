//! Fetch, normalize, compare, and conditionally persist.

use chrono::{DateTime, Utc};
use metadata::{MetadataDocument, MetadataStore, MetadataStoreExt, normalize, same_content};

use crate::error::Result;
use crate::source::CitySource;

/// What a successful run did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Stored content already matched upstream; nothing was written.
    Unchanged { states: usize },
    /// The store was replaced with fresh content.
    Updated {
        states: usize,
        cities: usize,
        synced_at: DateTime<Utc>,
    },
}

impl SyncOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, SyncOutcome::Updated { .. })
    }

    /// Short name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOutcome::Unchanged { .. } => "unchanged",
            SyncOutcome::Updated { .. } => "updated",
        }
    }
}

/// One refresh of the metadata store from an upstream source.
pub struct SyncJob<Src: CitySource, St: MetadataStore> {
    source: Src,
    store: St,
}

impl<Src: CitySource, St: MetadataStore> SyncJob<Src, St> {
    pub fn new(source: Src, store: St) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Runs the job once.
    ///
    /// Fetch and validation failures return before the store is read, so a
    /// failed run never writes.
    #[tracing::instrument(skip(self), fields(source = %self.source.url(), store = %self.store.location()))]
    pub async fn run(&self) -> Result<SyncOutcome> {
        let result = self.sync().await;

        match &result {
            Ok(outcome) => tracing::info!(outcome = outcome.as_str(), "sync run finished"),
            Err(err) => tracing::error!(outcome = err.as_str(), error = %err, "sync run failed"),
        }

        result
    }

    async fn sync(&self) -> Result<SyncOutcome> {
        tracing::info!(url = %self.source.url(), "fetching city records");
        let records = self.source.fetch().await?;

        let fresh = normalize(&records, self.source.url(), MetadataDocument::now());
        tracing::info!(
            records = records.len(),
            states = fresh.states.len(),
            cities = fresh.city_count(),
            "normalized upstream records"
        );

        let current = self
            .store
            .load_content_or_empty(self.source.url())
            .await?;

        if same_content(&fresh, &current)? {
            tracing::info!("no diff detected, metadata store is up to date");
            return Ok(SyncOutcome::Unchanged {
                states: current.states.len(),
            });
        }

        self.store.save(&fresh).await?;
        tracing::info!(
            previous_states = current.states.len(),
            states = fresh.states.len(),
            "metadata store updated with latest data"
        );

        Ok(SyncOutcome::Updated {
            states: fresh.states.len(),
            cities: fresh.city_count(),
            synced_at: fresh.last_synced_at.unwrap_or_else(MetadataDocument::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use metadata::{CityRecord, InMemoryMetadataStore, StoreError};

    use super::*;
    use crate::error::SyncError;
    use crate::schema::SchemaError;
    use crate::source::StaticCitySource;

    const SOURCE: &str = "https://example.test/cities";

    struct FailingSource(fn() -> SyncError);

    #[async_trait]
    impl CitySource for FailingSource {
        async fn fetch(&self) -> Result<Vec<CityRecord>> {
            Err((self.0)())
        }

        fn url(&self) -> &str {
            SOURCE
        }
    }

    /// Reads like an empty store but refuses every write.
    struct ReadOnlyStore;

    #[async_trait]
    impl MetadataStore for ReadOnlyStore {
        async fn read_raw(&self) -> metadata::Result<String> {
            Err(StoreError::NotFound(self.location()))
        }

        async fn save(&self, _doc: &MetadataDocument) -> metadata::Result<()> {
            Err(StoreError::Io {
                path: "meta-data.json.tmp".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn location(&self) -> String {
            "read-only".to_string()
        }
    }

    fn records() -> Vec<CityRecord> {
        vec![
            CityRecord::new("Goa", "Panaji"),
            CityRecord::new("Kerala", " Kochi"),
            CityRecord::new("Goa", "Margao"),
            CityRecord::new("Goa", "Panaji "),
        ]
    }

    fn job(
        records: Vec<CityRecord>,
        store: InMemoryMetadataStore,
    ) -> SyncJob<StaticCitySource, InMemoryMetadataStore> {
        SyncJob::new(StaticCitySource::new(SOURCE, records), store)
    }

    #[tokio::test]
    async fn first_run_writes_document() {
        let store = InMemoryMetadataStore::new();
        let outcome = job(records(), store.clone()).run().await.unwrap();

        assert!(outcome.is_updated());
        assert_eq!(store.write_count(), 1);

        let doc = store.load().await.unwrap();
        assert_eq!(doc.source, SOURCE);
        assert_eq!(doc.state("Goa").unwrap().cities, vec!["Margao", "Panaji"]);
        assert_eq!(doc.state("Kerala").unwrap().cities, vec!["Kochi"]);
        assert!(doc.last_synced_at.is_some());
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let store = InMemoryMetadataStore::new();
        job(records(), store.clone()).run().await.unwrap();
        let before = store.raw().await;

        let outcome = job(records(), store.clone()).run().await.unwrap();

        assert_eq!(outcome, SyncOutcome::Unchanged { states: 2 });
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.raw().await, before);
    }

    #[tokio::test]
    async fn stale_timestamp_alone_does_not_trigger_write() {
        let old = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let existing = normalize(&records(), SOURCE, old);
        let store = InMemoryMetadataStore::with_document(&existing).unwrap();

        let outcome = job(records(), store.clone()).run().await.unwrap();

        assert!(!outcome.is_updated());
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.load().await.unwrap().last_synced_at, Some(old));
    }

    #[tokio::test]
    async fn changed_content_is_written_with_newer_timestamp() {
        let old = Utc::now() - Duration::hours(1);
        let existing = normalize(&records(), SOURCE, old);
        let store = InMemoryMetadataStore::with_document(&existing).unwrap();

        let mut upstream = records();
        upstream.push(CityRecord::new("Assam", "Guwahati"));
        let outcome = job(upstream, store.clone()).run().await.unwrap();

        assert!(outcome.is_updated());
        let doc = store.load().await.unwrap();
        assert_eq!(doc.states[0].state, "Assam");
        assert!(doc.last_synced_at.unwrap() > old);
    }

    #[tokio::test]
    async fn malformed_store_is_replaced() {
        let store = InMemoryMetadataStore::with_raw("{\"states\": oops");
        let outcome = job(records(), store.clone()).run().await.unwrap();

        assert!(outcome.is_updated());
        assert_eq!(store.load().await.unwrap().states.len(), 2);
    }

    #[tokio::test]
    async fn empty_upstream_over_missing_store_is_unchanged() {
        let store = InMemoryMetadataStore::new();
        let outcome = job(vec![], store.clone()).run().await.unwrap();

        // Missing store and empty upstream compare equal.
        assert_eq!(outcome, SyncOutcome::Unchanged { states: 0 });
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn remote_failure_leaves_store_untouched() {
        let existing = normalize(&records(), SOURCE, Utc::now());
        let store = InMemoryMetadataStore::with_document(&existing).unwrap();
        let before = store.raw().await;

        let job = SyncJob::new(FailingSource(|| SyncError::status(503)), store.clone());
        let err = job.run().await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::RemoteUnavailable {
                status: Some(503),
                ..
            }
        ));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.raw().await, before);
    }

    #[tokio::test]
    async fn schema_failure_leaves_store_untouched() {
        let store = InMemoryMetadataStore::new();
        let job = SyncJob::new(
            FailingSource(|| {
                SyncError::SchemaMismatch(SchemaError::MissingField {
                    index: 0,
                    field: "city",
                })
            }),
            store.clone(),
        );

        let err = job.run().await.unwrap_err();

        assert!(matches!(err, SyncError::SchemaMismatch(_)));
        assert_eq!(store.write_count(), 0);
        assert!(store.raw().await.is_none());
    }

    #[tokio::test]
    async fn unparsable_stored_timestamp_does_not_trigger_write() {
        let raw = format!(
            r#"{{"lastSyncedAt":"2024-06-01","source":"{SOURCE}","states":[{{"state":"Goa","cities":["Panaji"]}}]}}"#
        );
        let store = InMemoryMetadataStore::with_raw(raw.clone());

        let outcome = job(vec![CityRecord::new("Goa", "Panaji")], store.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Unchanged { states: 1 });
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.raw().await, Some(raw));
    }

    #[tokio::test]
    async fn extra_stored_keys_do_not_trigger_write() {
        let raw = format!(
            r#"{{"lastSyncedAt":null,"generatedBy":"import","source":"{SOURCE}","states":[{{"state":"Goa","cities":["Panaji"]}}]}}"#
        );
        let store = InMemoryMetadataStore::with_raw(raw);

        let outcome = job(vec![CityRecord::new("Goa", "Panaji")], store.clone())
            .run()
            .await
            .unwrap();

        assert!(!outcome.is_updated());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn failed_save_is_a_store_error() {
        let job = SyncJob::new(StaticCitySource::new(SOURCE, records()), ReadOnlyStore);

        let err = job.run().await.unwrap_err();

        assert!(matches!(err, SyncError::Store(StoreError::Io { .. })));
        assert_eq!(err.as_str(), "store_error");
    }

    #[test]
    fn outcome_labels() {
        let unchanged = SyncOutcome::Unchanged { states: 3 };
        let updated = SyncOutcome::Updated {
            states: 3,
            cities: 9,
            synced_at: Utc::now(),
        };
        assert_eq!(unchanged.as_str(), "unchanged");
        assert_eq!(updated.as_str(), "updated");
    }
}
