//! Key-value persistence shared by every frontend.
//!
//! All values are JSON strings and keys are namespaced per puzzle id,
//! so browser localStorage, a file-backed map, and the in-memory test
//! double all expose the same layout:
//!
//! - `crosswBoard{id}` — the player grid, `[{xCoord, yCoord, content}]`
//! - `crosswTask{id}` — cached puzzle record
//! - `crosswUserBoard{id}` — completion record
//! - `crosswTasks` — the last-fetched catalog

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub const BOARD_PREFIX: &str = "crosswBoard";
pub const TASK_PREFIX: &str = "crosswTask";
pub const USER_BOARD_PREFIX: &str = "crosswUserBoard";
pub const TASKS_KEY: &str = "crosswTasks";

/// Persistence failure. Callers are expected to degrade to in-memory
/// operation rather than surface this to the player.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// The backing store rejected or cannot service the operation.
    Unavailable(String),
    /// A value could not be JSON-encoded.
    Encode(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(e) => write!(f, "storage unavailable: {}", e),
            Self::Encode(e) => write!(f, "storage encode error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

/// Minimal string key-value store.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

pub fn board_key(id: u32) -> String {
    format!("{}{}", BOARD_PREFIX, id)
}

pub fn task_key(id: u32) -> String {
    format!("{}{}", TASK_PREFIX, id)
}

pub fn progress_key(id: u32) -> String {
    format!("{}{}", USER_BOARD_PREFIX, id)
}

/// JSON-encodes and stores a value.
pub fn save_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: Storage + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    store.set(key, &json)
}

/// Loads and decodes a value. A corrupt stored value reads as absent;
/// it indicates a stale or foreign write, not a condition worth
/// failing a session over.
pub fn load_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(json) => Ok(serde_json::from_str(&json).ok()),
        None => Ok(None),
    }
}

/// In-memory storage: the unit-test double and the degraded-mode
/// fallback when a real backend is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}
