//! Core nonogram (Japanese crossword) engine.
//!
//! This crate owns everything the browser and terminal frontends share:
//! the immutable solution grid, legend (clue) generation, the mutable
//! player board with its toggle state machine and win detection, the
//! per-puzzle progress records, the backend wire models, and a small
//! key-value storage abstraction so localStorage, a file, and an
//! in-memory map can all back the same persistence layout.

pub mod api;
pub mod board;
pub mod catalog;
pub mod cell;
pub mod grid;
pub mod legend;
pub mod progress;
mod rng;
pub mod session;
pub mod storage;

pub use api::{ApiError, NewsItem, Task};
pub use board::{Board, BoardCell, Intent};
pub use catalog::{CatalogClient, FetchGuard, Resource, Transport, TransportResponse};
pub use cell::Cell;
pub use grid::{GridError, Solution};
pub use legend::Legend;
pub use progress::{ProgressRecord, ProgressStore};
pub use session::{GameSession, Toggle};
pub use storage::{MemoryStorage, Storage, StorageError};
