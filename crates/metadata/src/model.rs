//! The metadata document and the raw records it is built from.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A single raw `(state, city)` pair as delivered by the upstream source.
///
/// Untrusted: may carry surrounding whitespace and duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub state: String,
    pub city: String,
}

impl CityRecord {
    pub fn new(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
        }
    }
}

/// One state and its sorted, deduplicated cities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub state: String,
    pub cities: Vec<String>,
}

/// The persisted and served document.
///
/// Field order here is the key order of the serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    /// When the content last changed; `None` until the first sync.
    #[serde(with = "timestamp", default)]
    pub last_synced_at: Option<DateTime<Utc>>,
    pub source: String,
    pub states: Vec<StateEntry>,
}

impl MetadataDocument {
    /// The skeleton assumed when nothing has been stored yet.
    pub fn empty(source: impl Into<String>) -> Self {
        Self {
            last_synced_at: None,
            source: source.into(),
            states: Vec::new(),
        }
    }

    /// Current time at the precision the document persists.
    pub fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }

    /// Looks up a state entry by exact name. `states` must be sorted.
    pub fn state(&self, name: &str) -> Option<&StateEntry> {
        self.states
            .binary_search_by(|entry| entry.state.as_str().cmp(name))
            .ok()
            .map(|idx| &self.states[idx])
    }

    pub fn city_count(&self) -> usize {
        self.states.iter().map(|entry| entry.cities.len()).sum()
    }

    pub fn content(&self) -> DocumentContent {
        DocumentContent {
            source: self.source.clone(),
            states: self.states.clone(),
        }
    }
}

/// The part of a stored document that counts as its content.
///
/// Deserializing ignores every other key, so a stored `lastSyncedAt` in any
/// format cannot make an otherwise identical store look different.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub source: String,
    pub states: Vec<StateEntry>,
}

impl DocumentContent {
    pub fn empty(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            states: Vec::new(),
        }
    }
}

/// ISO-8601 UTC with millisecond precision and a `Z` suffix.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> MetadataDocument {
        MetadataDocument {
            last_synced_at: Some(Utc.with_ymd_and_hms(2025, 1, 31, 10, 20, 30).unwrap()),
            source: "https://example.test/cities".to_string(),
            states: vec![
                StateEntry {
                    state: "Goa".to_string(),
                    cities: vec!["Margao".to_string(), "Panaji".to_string()],
                },
                StateEntry {
                    state: "Kerala".to_string(),
                    cities: vec!["Kochi".to_string()],
                },
            ],
        }
    }

    #[test]
    fn serializes_camel_case_keys_in_declared_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.starts_with(
            r#"{"lastSyncedAt":"2025-01-31T10:20:30.000Z","source":"https://example.test/cities","states":["#
        ));
    }

    #[test]
    fn never_synced_serializes_as_null() {
        let doc = MetadataDocument::empty("https://example.test/cities");
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value["lastSyncedAt"].is_null());
        assert_eq!(value["states"], serde_json::json!([]));
    }

    #[test]
    fn parses_javascript_style_timestamp() {
        let json = r#"{
            "lastSyncedAt": "2024-06-01T08:15:42.517Z",
            "source": "https://example.test/cities",
            "states": []
        }"#;
        let doc: MetadataDocument = serde_json::from_str(json).unwrap();
        let ts = doc.last_synced_at.unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 517);
    }

    #[test]
    fn missing_last_synced_at_defaults_to_none() {
        let json = r#"{"source": "s", "states": []}"#;
        let doc: MetadataDocument = serde_json::from_str(json).unwrap();
        assert!(doc.last_synced_at.is_none());
    }

    #[test]
    fn missing_states_is_rejected() {
        let json = r#"{"lastSyncedAt": null, "source": "s"}"#;
        assert!(serde_json::from_str::<MetadataDocument>(json).is_err());
    }

    #[test]
    fn state_lookup_and_city_count() {
        let doc = sample();
        assert_eq!(doc.state("Kerala").unwrap().cities, vec!["Kochi"]);
        assert!(doc.state("kerala").is_none());
        assert_eq!(doc.city_count(), 3);
    }

    #[test]
    fn content_ignores_timestamp_format_and_extra_keys() {
        let json = r#"{
            "lastSyncedAt": "2024-06-01",
            "source": "https://example.test/cities",
            "states": [{"state": "Goa", "cities": ["Panaji"]}],
            "generatedBy": "cron"
        }"#;
        let content: DocumentContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.source, "https://example.test/cities");
        assert_eq!(content.states[0].cities, vec!["Panaji"]);

        assert!(serde_json::from_str::<MetadataDocument>(json).is_err());
    }

    #[test]
    fn content_of_document() {
        let doc = sample();
        let content = doc.content();
        assert_eq!(content.source, doc.source);
        assert_eq!(content.states, doc.states);
    }

    #[test]
    fn now_is_truncated_to_milliseconds() {
        let now = MetadataDocument::now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
