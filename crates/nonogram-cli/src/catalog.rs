//! File-backed catalog transport.
//!
//! The CLI reads its catalog from a saved copy of the list endpoint
//! response (same wire schema the site serves), so the full contract
//! path — status check, success flag, lenient decoding — runs on the
//! file contents.

use crate::storage::FileStorage;
use nonogram_core::{ApiError, Transport, TransportResponse};
use std::fs;
use std::path::PathBuf;

pub fn default_tasks_path() -> PathBuf {
    FileStorage::data_dir().join("tasks.json")
}

/// Serves every request from one file on disk.
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Transport for FileTransport {
    fn get(&self, _url: &str) -> Result<TransportResponse, ApiError> {
        fs::read_to_string(&self.path)
            .map(TransportResponse::ok)
            .map_err(|e| ApiError::Transport(format!("{}: {}", self.path.display(), e)))
    }
}
