//! Saved calculation history
//!
//! Append-only bounded log, newest first, persisted after every mutation.
//! Storage access is explicit: callers pass the store in, there is no
//! ambient state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::calc::{CalcInputs, CalculationResult};
use crate::infrastructure::storage::{KvStore, KEY_HISTORY};

/// Hard cap on retained entries; the oldest are evicted on overflow.
pub const HISTORY_CAPACITY: usize = 15;

/// One saved calculation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in epoch millis as a string, strictly monotonic
    pub id: String,
    /// Creation time in epoch millis
    pub saved_at: i64,
    #[serde(flatten)]
    pub result: CalculationResult,
}

pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    last_id: i64,
}

impl HistoryStore {
    /// Seed from persisted storage. Malformed or absent content yields an
    /// empty collection; no error surfaces.
    pub fn load(kv: &KvStore) -> Self {
        let entries: Vec<HistoryEntry> = kv.get(KEY_HISTORY).unwrap_or_default();
        let last_id = entries
            .iter()
            .filter_map(|entry| entry.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { entries, last_id }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Save a result: assign id and timestamp, prepend, evict past the
    /// cap, persist.
    pub fn append(&mut self, kv: &mut KvStore, result: &CalculationResult) -> HistoryEntry {
        let now = Utc::now().timestamp_millis();
        // ids stay unique even within a single-millisecond burst of saves
        let id = now.max(self.last_id + 1);
        self.last_id = id;

        let entry = HistoryEntry {
            id: id.to_string(),
            saved_at: now,
            result: result.clone(),
        };
        self.entries.insert(0, entry.clone());
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist(kv);
        entry
    }

    /// Remove by id. Unknown ids are a no-op, not an error.
    pub fn remove(&mut self, kv: &mut KvStore, id: &str) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        if self.entries.len() == before {
            debug!("History entry {} not found, nothing removed", id);
            return;
        }
        self.persist(kv);
    }

    /// Original inputs of a saved entry, for re-seeding the live
    /// calculation. Does not mutate the store.
    pub fn restore(&self, id: &str) -> Option<CalcInputs> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.result.inputs())
    }

    pub fn clear(&mut self, kv: &mut KvStore) {
        self.entries.clear();
        self.persist(kv);
    }

    fn persist(&self, kv: &mut KvStore) {
        kv.set(KEY_HISTORY, &self.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calc::compute;

    fn sample_result(investment: f64) -> CalculationResult {
        compute(investment, 86.50, 87.20, 0.1).unwrap()
    }

    fn open_store() -> (tempfile::TempDir, KvStore) {
        let dir = tempfile::tempdir().unwrap();
        let kv = KvStore::open(dir.path().join("state.json"));
        (dir, kv)
    }

    #[test]
    fn test_append_caps_at_capacity_newest_first() {
        let (_dir, mut kv) = open_store();
        let mut store = HistoryStore::load(&kv);

        for i in 0..20 {
            store.append(&mut kv, &sample_result(1000.0 + i as f64));
        }

        assert_eq!(store.len(), HISTORY_CAPACITY);
        // newest first: the last append leads, the first five are gone
        assert_eq!(store.entries()[0].result.investment, 1019.0);
        assert_eq!(store.entries()[14].result.investment, 1005.0);
    }

    #[test]
    fn test_ids_are_unique_and_monotonic_within_a_burst() {
        let (_dir, mut kv) = open_store();
        let mut store = HistoryStore::load(&kv);

        let ids: Vec<i64> = (0..10)
            .map(|_| {
                store
                    .append(&mut kv, &sample_result(1000.0))
                    .id
                    .parse::<i64>()
                    .unwrap()
            })
            .collect();

        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_remove_unknown_id_is_a_noop() {
        let (_dir, mut kv) = open_store();
        let mut store = HistoryStore::load(&kv);
        store.append(&mut kv, &sample_result(1000.0));

        store.remove(&mut kv, "does-not-exist");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_then_restore_finds_nothing() {
        let (_dir, mut kv) = open_store();
        let mut store = HistoryStore::load(&kv);
        let entry = store.append(&mut kv, &sample_result(1000.0));

        store.remove(&mut kv, &entry.id);
        assert!(store.restore(&entry.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_returns_original_inputs_without_mutation() {
        let (_dir, mut kv) = open_store();
        let mut store = HistoryStore::load(&kv);
        let entry = store.append(&mut kv, &sample_result(42_000.0));

        let inputs = store.restore(&entry.id).unwrap();
        assert_eq!(inputs.investment, 42_000.0);
        assert_eq!(inputs.buy_rate, 86.50);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persisted_collection_round_trips_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut kv = KvStore::open(&path);
        let mut store = HistoryStore::load(&kv);
        for i in 0..5 {
            store.append(&mut kv, &sample_result(1000.0 + i as f64));
        }
        let saved: Vec<HistoryEntry> = store.entries().to_vec();

        let reopened_kv = KvStore::open(&path);
        let reopened = HistoryStore::load(&reopened_kv);
        assert_eq!(reopened.entries(), saved.as_slice());
    }

    #[test]
    fn test_malformed_history_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"history": "oops"}"#).unwrap();

        let kv = KvStore::open(&path);
        let store = HistoryStore::load(&kv);
        assert!(store.is_empty());
    }
}
