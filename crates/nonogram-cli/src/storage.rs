//! File-backed key-value storage in the user's data directory.

use nonogram_core::{Storage, StorageError};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Single JSON file holding boards, cached tasks, and progress records,
/// one entry per storage key. Every write flushes to disk so separate
/// command invocations see each other's state.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileStorage {
    /// `NONOGRAM_DATA_DIR` overrides the platform data directory.
    pub fn data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("NONOGRAM_DATA_DIR") {
            return PathBuf::from(dir);
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nonogram")
    }

    pub fn open_default() -> Self {
        Self::open(Self::data_dir().join("nonogram_saves.json"))
    }

    /// Opens the store; a missing or unreadable file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self { path, values }
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .values
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| StorageError::Encode(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        self.flush()
    }
}
