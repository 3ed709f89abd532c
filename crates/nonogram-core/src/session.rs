//! Game session: the board-state engine for one active puzzle.
//!
//! A session owns the player grid for its puzzle id, applies
//! click-derived intents, persists after every mutation, and computes
//! the win condition. Persistence failures degrade to in-memory play
//! for the rest of the session; they are never surfaced as errors.

use crate::api::Task;
use crate::board::{Board, BoardCell, Intent};
use crate::cell::Cell;
use crate::grid::{GridError, Solution};
use crate::legend::Legend;
use crate::progress::ProgressRecord;
use crate::rng::SimpleRng;
use crate::storage::{self, Storage};

/// Result of a toggle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The cell changed; `win` is the post-mutation win check.
    Applied { win: bool },
    /// Out-of-range index; the board is untouched.
    Ignored,
}

/// One puzzle's play session over a storage backend.
///
/// The engine does not lock a solved board; frontends are expected to
/// stop forwarding mutations once [`is_win`](Self::is_win) or
/// [`game_completed`](Self::game_completed) reports true.
pub struct GameSession<S: Storage> {
    store: S,
    task: Task,
    solution: Solution,
    board: Board,
    horizontal: Legend,
    vertical: Legend,
    win: bool,
    completed: bool,
    degraded: bool,
    rng: SimpleRng,
}

impl<S: Storage> GameSession<S> {
    /// Restores the persisted board for the task or starts a fresh one,
    /// and persists immediately so a new session is durable from the
    /// start. Fails only on a malformed task record.
    pub fn new(task: Task, store: S) -> Result<Self, GridError> {
        Self::with_rng(task, store, SimpleRng::new())
    }

    /// Deterministic variant for tests: seeds the hint draw.
    pub fn with_seed(task: Task, store: S, seed: u64) -> Result<Self, GridError> {
        Self::with_rng(task, store, SimpleRng::with_seed(seed))
    }

    fn with_rng(task: Task, store: S, rng: SimpleRng) -> Result<Self, GridError> {
        let solution = Solution::from_task(&task)?;
        let horizontal = Legend::horizontal(&solution);
        let vertical = Legend::vertical(&solution);
        let board = Board::new(solution.width(), solution.height());

        let mut session = Self {
            store,
            task,
            solution,
            board,
            horizontal,
            vertical,
            win: false,
            completed: false,
            degraded: false,
            rng,
        };
        session.completed = session.progress().game_completed;
        session.init_board();
        Ok(session)
    }

    fn init_board(&mut self) {
        let key = storage::board_key(self.task.id);
        match storage::load_json::<S, Vec<BoardCell>>(&self.store, &key) {
            Ok(Some(cells)) => {
                // A stale save whose shape no longer matches the task is
                // discarded rather than rendered corrupt.
                match Board::from_cells(cells, self.solution.width(), self.solution.height()) {
                    Ok(board) => self.board = board,
                    Err(_) => {
                        self.board = Board::new(self.solution.width(), self.solution.height())
                    }
                }
            }
            Ok(None) => {}
            Err(_) => self.degraded = true,
        }
        self.persist_board();
    }

    fn persist_board(&mut self) {
        let key = storage::board_key(self.task.id);
        if storage::save_json(&mut self.store, &key, self.board.cells()).is_err() {
            self.degraded = true;
        }
    }

    /// Applies a click intent at a flat index, persists, and runs the
    /// win check. Out of range is a complete no-op.
    pub fn toggle_cell(&mut self, index: usize, intent: Intent) -> Toggle {
        if !self.board.toggle(index, intent) {
            return Toggle::Ignored;
        }
        let win = self.check_win();
        self.persist_board();
        Toggle::Applied { win }
    }

    fn check_win(&mut self) -> bool {
        if self.win {
            return true;
        }
        if self.board.check_win(&self.solution) {
            // Residual marks are cleaned up before the final persist so
            // a later reload shows the finished picture.
            self.board.normalize_marks();
            self.win = true;
        }
        self.win
    }

    /// Paints one correct cell, chosen uniformly among solution-filled
    /// cells the player has not painted yet. Returns the index, or
    /// `None` when no such cell remains.
    pub fn apply_hint(&mut self) -> Option<usize> {
        let candidates = self.board.hint_candidates(&self.solution);
        if candidates.is_empty() {
            return None;
        }
        let index = candidates[self.rng.next_usize(candidates.len())];
        self.board.set(index, Cell::Filled);
        self.persist_board();
        Some(index)
    }

    /// Discards the persisted grid and rebuilds an empty one. The
    /// session's completion override resets, but the persisted progress
    /// record is untouched; erasing history is an explicit, separate
    /// operation (`ProgressStore::clear`).
    pub fn restart(&mut self) {
        let _ = self.store.remove(&storage::board_key(self.task.id));
        self.win = false;
        self.completed = false;
        self.board = Board::new(self.solution.width(), self.solution.height());
        self.persist_board();
    }

    /// Explicitly erases the puzzle's completion record.
    pub fn clear_progress(&mut self) {
        let _ = self.store.remove(&storage::progress_key(self.task.id));
        self.completed = false;
    }

    /// Marks the puzzle completed and persists the record.
    pub fn record_completion(&mut self, time: String, stars: u32) {
        let record = ProgressRecord::completed(self.task.id, time, stars);
        let key = storage::progress_key(self.task.id);
        if storage::save_json(&mut self.store, &key, &record).is_err() {
            self.degraded = true;
        }
        self.completed = true;
    }

    /// The persisted completion record, or the zero-value record.
    pub fn progress(&self) -> ProgressRecord {
        storage::load_json(&self.store, &storage::progress_key(self.task.id))
            .ok()
            .flatten()
            .unwrap_or_else(|| ProgressRecord::empty(self.task.id))
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn horizontal_legend(&self) -> &Legend {
        &self.horizontal
    }

    pub fn vertical_legend(&self) -> &Legend {
        &self.vertical
    }

    pub fn width(&self) -> usize {
        self.solution.width()
    }

    pub fn height(&self) -> usize {
        self.solution.height()
    }

    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        self.board.index_of(x, y)
    }

    /// Win detected during this session.
    pub fn is_win(&self) -> bool {
        self.win
    }

    /// The puzzle was completed, this session or a previous one.
    pub fn game_completed(&self) -> bool {
        self.completed
    }

    /// True once a persistence operation has failed; play continues in
    /// memory only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}
