//! Per-puzzle completion records.
//!
//! Progress lives independently of the player grid: restarting a board
//! does not erase the historical completion, only an explicit
//! [`ProgressStore::clear`] does.

use crate::storage::{self, Storage, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Completion record for one puzzle, in its persisted shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(rename = "gameCompleted")]
    pub game_completed: bool,
    pub id: u32,
    #[serde(default)]
    pub time: String,
    #[serde(rename = "star", default)]
    pub stars: u32,
}

impl ProgressRecord {
    /// The zero-value record returned when nothing is stored for an
    /// id, so callers never deal with an absent value.
    pub fn empty(id: u32) -> Self {
        Self {
            game_completed: false,
            id,
            time: String::new(),
            stars: 0,
        }
    }

    pub fn completed(id: u32, time: String, stars: u32) -> Self {
        Self {
            game_completed: true,
            id,
            time,
            stars,
        }
    }
}

/// In-memory index over the persisted records, loaded lazily per id.
#[derive(Debug, Default)]
pub struct ProgressStore {
    records: HashMap<u32, ProgressRecord>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts a record and writes it through. The in-memory copy is
    /// kept even when the write fails; lost durability is acceptable,
    /// a lost record within the session is not.
    pub fn record_completion<S: Storage>(
        &mut self,
        store: &mut S,
        record: ProgressRecord,
    ) -> Result<(), StorageError> {
        let result = storage::save_json(store, &storage::progress_key(record.id), &record);
        self.records.insert(record.id, record);
        result
    }

    /// The record for a puzzle: in-memory copy, else the persisted one,
    /// else the zero-value record.
    pub fn get_by_puzzle_id<S: Storage>(&mut self, store: &S, id: u32) -> ProgressRecord {
        if let Some(record) = self.records.get(&id) {
            return record.clone();
        }
        if let Ok(Some(record)) =
            storage::load_json::<S, ProgressRecord>(store, &storage::progress_key(id))
        {
            self.records.insert(id, record.clone());
            return record;
        }
        ProgressRecord::empty(id)
    }

    /// Explicitly erases a puzzle's completion, memory and disk both.
    pub fn clear<S: Storage>(&mut self, store: &mut S, id: u32) -> Result<(), StorageError> {
        self.records.remove(&id);
        store.remove(&storage::progress_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_absent_id_yields_zero_value_record() {
        let store = MemoryStorage::new();
        let mut progress = ProgressStore::new();
        let record = progress.get_by_puzzle_id(&store, 42);
        assert_eq!(record, ProgressRecord::empty(42));
        assert!(!record.game_completed);
        assert_eq!(record.time, "");
        assert_eq!(record.stars, 0);
    }

    #[test]
    fn test_record_completion_upserts() {
        let mut store = MemoryStorage::new();
        let mut progress = ProgressStore::new();

        progress
            .record_completion(&mut store, ProgressRecord::completed(7, "01:30".into(), 2))
            .unwrap();
        assert_eq!(progress.get_by_puzzle_id(&store, 7).stars, 2);

        // Replaces the existing record for the same id.
        progress
            .record_completion(&mut store, ProgressRecord::completed(7, "00:45".into(), 3))
            .unwrap();
        let record = progress.get_by_puzzle_id(&store, 7);
        assert_eq!(record.time, "00:45");
        assert_eq!(record.stars, 3);
    }

    #[test]
    fn test_records_survive_a_new_store_instance() {
        let mut store = MemoryStorage::new();
        let mut progress = ProgressStore::new();
        progress
            .record_completion(&mut store, ProgressRecord::completed(9, "02:00".into(), 1))
            .unwrap();

        // A fresh index reads the persisted copy.
        let mut fresh = ProgressStore::new();
        assert!(fresh.get_by_puzzle_id(&store, 9).game_completed);
    }

    #[test]
    fn test_clear_erases_the_record() {
        let mut store = MemoryStorage::new();
        let mut progress = ProgressStore::new();
        progress
            .record_completion(&mut store, ProgressRecord::completed(5, String::new(), 0))
            .unwrap();
        progress.clear(&mut store, 5).unwrap();
        assert!(!progress.get_by_puzzle_id(&store, 5).game_completed);
    }

    #[test]
    fn test_persisted_shape() {
        let mut store = MemoryStorage::new();
        let mut progress = ProgressStore::new();
        progress
            .record_completion(&mut store, ProgressRecord::completed(3, "00:10".into(), 3))
            .unwrap();
        let raw = store.get("crosswUserBoard3").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["gameCompleted"], true);
        assert_eq!(value["id"], 3);
        assert_eq!(value["star"], 3);
    }
}
