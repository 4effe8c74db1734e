//! Append-only history of analyses.
//!
//! Records are never deduplicated or expired; they leave the store only
//! through an explicit delete.

use super::slot::JsonSlot;
use super::HISTORY_SLOT;
use crate::models::HistoryRecord;
use std::path::Path;
use tracing::{debug, info};

/// In-memory history backed by the `textguard_history` slot.
pub struct HistoryStore {
    slot: JsonSlot<HistoryRecord>,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    /// Open the store, loading whatever the slot currently holds.
    pub fn open(data_dir: &Path) -> Self {
        let slot = JsonSlot::new(data_dir, HISTORY_SLOT);
        let records = slot.load();
        debug!(
            "Loaded {} history records from {}",
            records.len(),
            slot.path().display()
        );
        Self { slot, records }
    }

    /// Prepend a record and persist. A failed write leaves the store unchanged.
    pub fn append(&mut self, record: HistoryRecord) -> std::io::Result<()> {
        info!("Saving history record {}", record.id);
        self.records.insert(0, record);
        if let Err(e) = self.slot.save(&self.records) {
            self.records.remove(0);
            return Err(e);
        }
        Ok(())
    }

    /// Remove the record with `id`, persisting if it existed.
    pub fn delete(&mut self, id: &str) -> std::io::Result<Option<HistoryRecord>> {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.slot.save(&self.records) {
            self.records.insert(index, removed);
            return Err(e);
        }
        info!("Deleted history record {}", id);
        Ok(Some(removed))
    }

    pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records ordered by timestamp, newest first.
    pub fn newest_first(&self) -> Vec<&HistoryRecord> {
        let mut records: Vec<&HistoryRecord> = self.records.iter().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{sample_analysis, sample_humanized};
    use crate::models::Tone;

    fn record(text: &str, timestamp: i64) -> HistoryRecord {
        let mut record = HistoryRecord::new(text.to_string(), sample_analysis(50.0), None, None);
        record.timestamp = timestamp;
        record
    }

    #[test]
    fn test_append_prepends_newest() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path());

        store.append(record("first", 1)).unwrap();
        store.append(record("second", 2)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.newest_first()[0].original_text, "second");
    }

    #[test]
    fn test_append_never_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path());

        store.append(record("same", 1)).unwrap();
        store.append(record("same", 1)).unwrap();

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_delete_removes_only_target_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path());
        let keep_a = record("a", 1);
        let target = record("b", 2);
        let keep_c = record("c", 3);
        let target_id = target.id.clone();

        store.append(keep_a.clone()).unwrap();
        store.append(target).unwrap();
        store.append(keep_c.clone()).unwrap();

        let removed = store.delete(&target_id).unwrap();
        assert_eq!(removed.map(|r| r.original_text), Some("b".to_string()));

        let reloaded = HistoryStore::open(dir.path());
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.get(&target_id).is_none());
        assert_eq!(reloaded.get(&keep_a.id), Some(&keep_a));
        assert_eq!(reloaded.get(&keep_c.id), Some(&keep_c));
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path());
        store.append(record("a", 1)).unwrap();

        assert!(store.delete("missing").unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_history_survives_reload_losslessly() {
        let dir = tempfile::tempdir().unwrap();
        let full = HistoryRecord::new(
            "Some text with ünïcode".to_string(),
            sample_analysis(33.5),
            Some(sample_humanized()),
            Some(Tone::Academic),
        );
        let plain = record("plain", 5);

        {
            let mut store = HistoryStore::open(dir.path());
            store.append(plain.clone()).unwrap();
            store.append(full.clone()).unwrap();
        }

        let reloaded = HistoryStore::open(dir.path());
        assert_eq!(reloaded.get(&full.id), Some(&full));
        assert_eq!(reloaded.get(&plain.id), Some(&plain));
    }

    #[test]
    fn test_failed_append_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let mut store = HistoryStore::open(&blocker.join("data"));
        assert!(store.append(record("lost", 1)).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_delete_keeps_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path());
        let kept = record("kept", 1);
        store.append(kept.clone()).unwrap();

        // A directory in place of the slot file makes the rename fail.
        let slot_path = dir.path().join("textguard_history.json");
        std::fs::remove_file(&slot_path).unwrap();
        std::fs::create_dir(&slot_path).unwrap();

        assert!(store.delete(&kept.id).is_err());
        assert_eq!(store.get(&kept.id), Some(&kept));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_corrupt_history_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("textguard_history.json"), "[{\"id\":").unwrap();

        let store = HistoryStore::open(dir.path());
        assert!(store.is_empty());
    }
}
