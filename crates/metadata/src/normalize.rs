//! Grouping raw records into the canonical `states` shape.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::model::{CityRecord, MetadataDocument, StateEntry};

/// Ordered, deduplicating index of cities keyed by state.
///
/// Keys and members compare with `Ord for str`, so the equality used to
/// deduplicate is the same relation used to sort. Comparison is
/// case-sensitive: `"X"` and `"x"` are distinct cities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityIndex {
    states: BTreeMap<String, BTreeSet<String>>,
}

impl CityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a trimmed `(state, city)` pair.
    ///
    /// Returns `false` if the pair was already present.
    pub fn insert(&mut self, state: &str, city: &str) -> bool {
        self.states
            .entry(state.trim().to_string())
            .or_default()
            .insert(city.trim().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn city_count(&self) -> usize {
        self.states.values().map(BTreeSet::len).sum()
    }

    /// Materializes the index as state entries, both levels sorted.
    pub fn into_states(self) -> Vec<StateEntry> {
        self.states
            .into_iter()
            .map(|(state, cities)| StateEntry {
                state,
                cities: cities.into_iter().collect(),
            })
            .collect()
    }
}

impl<'a> Extend<&'a CityRecord> for CityIndex {
    fn extend<I: IntoIterator<Item = &'a CityRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(&record.state, &record.city);
        }
    }
}

impl<'a> FromIterator<&'a CityRecord> for CityIndex {
    fn from_iter<I: IntoIterator<Item = &'a CityRecord>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

/// Builds a metadata document from raw records.
///
/// The result depends only on the set of trimmed pairs in `records`, not on
/// their order or multiplicity.
pub fn normalize(
    records: &[CityRecord],
    source: &str,
    synced_at: DateTime<Utc>,
) -> MetadataDocument {
    let index: CityIndex = records.iter().collect();
    MetadataDocument {
        last_synced_at: Some(synced_at),
        source: source.to_string(),
        states: index.into_states(),
    }
}
