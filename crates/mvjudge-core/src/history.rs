use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ReviewError;
use crate::record::StrictScores;
use crate::storage::KeyValueStore;
use crate::types::{ReviewDetails, ReviewResult};

/// Storage key holding the serialized history array.
pub const HISTORY_KEY: &str = "reviewHistory";

/// Review history, newest first, mirrored to a key-value store.
///
/// After every successful mutating call the stored value equals the
/// serialized in-memory sequence. When a write fails the in-memory change is
/// kept and the failure is returned as [`ReviewError::PersistenceError`];
/// the next mutating call writes the full sequence again.
pub struct HistoryStore<S: KeyValueStore> {
    storage: S,
    records: Vec<ReviewResult>,
    // Storage lags behind `records` after a failed write.
    dirty: bool,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Load history from `storage`. Absent, unreadable or malformed data
    /// yields an empty history.
    pub fn load(storage: S) -> Self {
        let records = match storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => parse_history(&raw).unwrap_or_else(|| {
                warn!(key = HISTORY_KEY, "discarding malformed review history");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = HISTORY_KEY, error = %e, "failed to read review history");
                Vec::new()
            }
        };
        debug!(count = records.len(), "loaded review history");
        Self {
            storage,
            records,
            dirty: false,
        }
    }

    /// All records, most recent first.
    pub fn records(&self) -> &[ReviewResult] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ReviewResult> {
        self.records.iter().find(|r| r.id == id)
    }

    /// The most recently added record.
    pub fn latest(&self) -> Option<&ReviewResult> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Prepend `record` and persist.
    pub fn add(&mut self, record: ReviewResult) -> Result<(), ReviewError> {
        if self.get(&record.id).is_some() {
            return Err(ReviewError::DuplicateRecord(record.id));
        }
        debug!(id = %record.id, file = %record.file_name, "adding review record");
        self.records.insert(0, record);
        self.flush()
    }

    /// Remove the record with `id`. Returns false if no such record exists;
    /// storage is then only written to catch up after an earlier failure.
    pub fn delete_by_id(&mut self, id: &str) -> Result<bool, ReviewError> {
        let Some(pos) = self.records.iter().position(|r| r.id == id) else {
            if self.dirty {
                self.flush()?;
            }
            return Ok(false);
        };
        self.records.remove(pos);
        debug!(id, "deleted review record");
        self.flush()?;
        Ok(true)
    }

    /// Drop every record and remove the storage entry.
    pub fn clear(&mut self) -> Result<(), ReviewError> {
        self.records.clear();
        debug!("cleared review history");
        let result = self.storage.remove(HISTORY_KEY);
        self.dirty = result.is_err();
        result.map_err(|e| {
            warn!(error = %e, "failed to remove review history");
            ReviewError::from(e)
        })
    }

    fn flush(&mut self) -> Result<(), ReviewError> {
        let payload =
            serde_json::to_string(&self.records).expect("review records should be serializable");
        let result = self.storage.set(HISTORY_KEY, &payload);
        self.dirty = result.is_err();
        result.map_err(|e| {
            warn!(error = %e, count = self.records.len(), "failed to persist review history");
            ReviewError::from(e)
        })
    }
}

/// Parse a stored history payload. `None` unless it is a JSON array of
/// well-formed records. Repeated ids keep their first occurrence.
fn parse_history(raw: &str) -> Option<Vec<ReviewResult>> {
    let value: Value = serde_json::from_str(raw).ok()?;
    if !value.is_array() {
        return None;
    }
    let parsed: Vec<StoredRecord> = serde_json::from_value(value).ok()?;

    let mut seen = HashSet::new();
    let records = parsed
        .into_iter()
        .map(ReviewResult::from)
        .filter(|r| seen.insert(r.id.clone()))
        .collect();
    Some(records)
}

// Persisted record shape. Unlike `ReviewResult`, a missing score key is a
// shape mismatch rather than a zero.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    id: String,
    file_name: String,
    scores: StrictScores,
    total_score: f64,
    details: ReviewDetails,
    timestamp: i64,
}

impl From<StoredRecord> for ReviewResult {
    fn from(r: StoredRecord) -> Self {
        ReviewResult {
            id: r.id,
            file_name: r.file_name,
            scores: r.scores.into(),
            total_score: r.total_score,
            details: r.details,
            timestamp: r.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use crate::types::{ReviewDetails, ReviewScores};

    fn record(id: &str, total: f64) -> ReviewResult {
        ReviewResult {
            id: id.to_string(),
            file_name: format!("{id}.mp4"),
            scores: ReviewScores::uniform(total),
            total_score: total,
            details: ReviewDetails {
                overall_suggestion: format!("suggestion for {id}"),
                ..ReviewDetails::default()
            },
            timestamp: 1_700_000_000_000,
        }
    }

    fn ids<S: KeyValueStore>(store: &HistoryStore<S>) -> Vec<&str> {
        store.records().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_load_empty_storage() {
        let store = HistoryStore::load(MemoryStore::new());
        assert!(store.is_empty());
        assert!(store.latest().is_none());
    }

    #[test]
    fn test_add_is_most_recent_first() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.add(record("a", 10.0)).unwrap();
        store.add(record("b", 20.0)).unwrap();
        store.add(record("c", 30.0)).unwrap();
        assert_eq!(ids(&store), vec!["c", "b", "a"]);
        assert_eq!(store.latest().unwrap().id, "c");
    }

    #[test]
    fn test_add_then_delete_restores_prior_content() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.add(record("a", 10.0)).unwrap();
        store.add(record("b", 20.0)).unwrap();
        let before = store.records().to_vec();
        let persisted_before = store.storage().get(HISTORY_KEY).unwrap();

        store.add(record("new", 50.0)).unwrap();
        assert!(store.delete_by_id("new").unwrap());

        assert_eq!(store.records(), before.as_slice());
        assert_eq!(store.storage().get(HISTORY_KEY).unwrap(), persisted_before);
    }

    #[test]
    fn test_add_then_delete_on_empty_history() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.add(record("only", 50.0)).unwrap();
        assert!(store.delete_by_id("only").unwrap());
        assert!(store.is_empty());
        assert_eq!(store.storage().get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.add(record("a", 10.0)).unwrap();
        assert!(!store.delete_by_id("zzz").unwrap());
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.add(record("a", 10.0)).unwrap();
        let err = store.add(record("a", 99.0)).unwrap_err();
        assert!(matches!(err, ReviewError::DuplicateRecord(ref id) if id == "a"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().total_score, 10.0);
    }

    #[test]
    fn test_reload_roundtrip() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.add(record("a", 10.5)).unwrap();
        store.add(record("b", 77.0)).unwrap();
        let before = store.records().to_vec();

        let reloaded = HistoryStore::load(store.into_storage());
        assert_eq!(reloaded.records(), before.as_slice());
    }

    #[test]
    fn test_reload_roundtrip_empty() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.add(record("a", 10.0)).unwrap();
        store.delete_by_id("a").unwrap();
        let reloaded = HistoryStore::load(store.into_storage());
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_reload_from_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::load(FileStore::new(dir.path()));
        store.add(record("a", 60.0)).unwrap();
        store.add(record("b", 70.0)).unwrap();
        drop(store);

        let reloaded = HistoryStore::load(FileStore::new(dir.path()));
        assert_eq!(ids(&reloaded), vec!["b", "a"]);
    }

    #[test]
    fn test_corrupted_payload_loads_empty() {
        let mut missing_scores = serde_json::to_value(record("a", 77.0)).unwrap();
        missing_scores["scores"] = serde_json::json!({"music": 90});
        let missing_scores = serde_json::json!([missing_scores]).to_string();

        let cases = [
            "not json",
            "{\"id\": \"a\"}",
            "42",
            "null",
            "[{\"id\": \"a\"}]",
            "[1, 2, 3]",
            missing_scores.as_str(),
        ];
        for raw in cases {
            let mut storage = MemoryStore::new();
            storage.set(HISTORY_KEY, raw).unwrap();
            let store = HistoryStore::load(storage);
            assert!(store.is_empty(), "payload {raw:?} should load empty");
        }
    }

    #[test]
    fn test_partially_valid_array_is_not_partially_loaded() {
        let good = serde_json::to_value(record("a", 10.0)).unwrap();
        let payload = serde_json::json!([good, {"id": "broken"}]).to_string();
        let mut storage = MemoryStore::new();
        storage.set(HISTORY_KEY, &payload).unwrap();
        assert!(HistoryStore::load(storage).is_empty());
    }

    #[test]
    fn test_duplicate_ids_in_payload_keep_first() {
        let payload = serde_json::to_string(&vec![record("a", 10.0), record("a", 90.0)]).unwrap();
        let mut storage = MemoryStore::new();
        storage.set(HISTORY_KEY, &payload).unwrap();
        let store = HistoryStore::load(storage);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().total_score, 10.0);
    }

    #[test]
    fn test_clear_removes_storage_entry() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.add(record("a", 10.0)).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(!store.storage().contains(HISTORY_KEY));
    }

    #[test]
    fn test_failed_write_is_retried_on_next_delete() {
        let mut store = HistoryStore::load(MemoryStore::with_quota(10));
        assert!(store.add(record("a", 10.0)).is_err());

        store.storage_mut().set_quota(None);
        assert!(!store.delete_by_id("missing").unwrap());

        let reloaded = HistoryStore::load(store.into_storage());
        assert_eq!(ids(&reloaded), vec!["a"]);
    }

    #[test]
    fn test_delete_missing_id_does_not_write_when_in_sync() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.add(record("a", 10.0)).unwrap();
        store.storage_mut().set_quota(Some(0));
        assert!(!store.delete_by_id("missing").unwrap());
    }

    #[test]
    fn test_persistence_failure_keeps_in_memory_change() {
        let mut store = HistoryStore::load(MemoryStore::with_quota(10));
        let err = store.add(record("a", 10.0)).unwrap_err();
        assert!(matches!(err, ReviewError::PersistenceError(_)));
        assert_eq!(ids(&store), vec!["a"]);
        assert_eq!(store.storage().get(HISTORY_KEY).unwrap(), None);
    }
}
