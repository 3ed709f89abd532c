//! localStorage-backed persistence with in-memory degradation.

use nonogram_core::{MemoryStorage, Storage, StorageError};

/// Browser storage. Falls back to a process-local map when localStorage
/// is unavailable or rejects a write (quota exceeded, privacy mode):
/// play continues, durability is lost for the session. The degradation
/// is reported once on the console and never surfaced as an error.
pub struct BrowserStorage {
    local: Option<web_sys::Storage>,
    fallback: MemoryStorage,
    warned: bool,
}

impl BrowserStorage {
    pub fn new() -> Self {
        let local = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if local.is_none() {
            crate::warn("localStorage unavailable; progress will not survive a reload");
        }
        let warned = local.is_none();
        Self {
            local,
            fallback: MemoryStorage::new(),
            warned,
        }
    }

    fn warn_once(&mut self) {
        if !self.warned {
            crate::warn("localStorage write rejected; progress will not survive a reload");
            self.warned = true;
        }
    }
}

impl Default for BrowserStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(ref local) = self.local {
            if let Ok(Some(value)) = local.get_item(key) {
                return Ok(Some(value));
            }
        }
        self.fallback.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(ref local) = self.local {
            if local.set_item(key, value).is_ok() {
                return Ok(());
            }
            self.warn_once();
        }
        self.fallback.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if let Some(ref local) = self.local {
            let _ = local.remove_item(key);
        }
        self.fallback.remove(key)
    }
}
