//! The browser-facing game controller for one puzzle.

use nonogram_core::{GameSession, Intent, Task, Toggle};
use wasm_bindgen::prelude::*;

use crate::storage::BrowserStorage;

/// Controller for a single puzzle's play session.
///
/// Construct it with a task record in the backend wire shape; the page
/// forwards pointer events and renders from the getters. A solved
/// session is read-only until [`restart`](Self::restart).
#[wasm_bindgen]
pub struct NonogramGame {
    session: GameSession<BrowserStorage>,
}

#[wasm_bindgen]
impl NonogramGame {
    /// `task_json` is a single puzzle record (the shape cached by
    /// [`CatalogStore::task_json`](crate::CatalogStore::task_json)).
    #[wasm_bindgen(constructor)]
    pub fn new(task_json: &str) -> Result<NonogramGame, JsValue> {
        let task: Task = serde_json::from_str(task_json)
            .map_err(|e| JsValue::from_str(&format!("invalid task record: {}", e)))?;
        let session = GameSession::new(task, BrowserStorage::new())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(NonogramGame { session })
    }

    /// Applies a pointer event on cell (x, y). `buttons` follows
    /// `MouseEvent.buttons`: 1 paints, anything else marks. Returns
    /// true when the board changed.
    pub fn handle_click(&mut self, x: u32, y: u32, buttons: u32) -> bool {
        if self.session.is_win() || self.session.game_completed() {
            return false;
        }
        let Some(index) = self.session.index_of(x as usize, y as usize) else {
            crate::warn(&format!("ignoring click outside the board: ({}, {})", x, y));
            return false;
        };
        let intent = if buttons == 1 {
            Intent::Primary
        } else {
            Intent::Secondary
        };
        match self.session.toggle_cell(index, intent) {
            Toggle::Applied { win } => {
                if win {
                    // The record carries no time or rating from the
                    // click path; record_completion can enrich it.
                    self.session.record_completion(String::new(), 0);
                }
                true
            }
            Toggle::Ignored => false,
        }
    }

    /// Paints one correct cell. Returns its flat index, or undefined
    /// when nothing is left to hint (or the puzzle is solved).
    pub fn apply_hint(&mut self) -> Option<u32> {
        if self.session.is_win() || self.session.game_completed() {
            return None;
        }
        self.session.apply_hint().map(|index| index as u32)
    }

    /// Discards the saved grid and starts over. The historical
    /// completion record survives; use
    /// [`clear_progress`](Self::clear_progress) to erase it.
    pub fn restart(&mut self) {
        self.session.restart();
    }

    /// Overwrites the completion record with a time and star rating.
    pub fn record_completion(&mut self, time: &str, stars: u32) {
        self.session.record_completion(time.to_string(), stars);
    }

    /// Explicitly erases the completion record.
    pub fn clear_progress(&mut self) {
        self.session.clear_progress();
    }

    pub fn is_win(&self) -> bool {
        self.session.is_win()
    }

    pub fn game_completed(&self) -> bool {
        self.session.game_completed()
    }

    pub fn is_degraded(&self) -> bool {
        self.session.is_degraded()
    }

    pub fn width(&self) -> u32 {
        self.session.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.session.height() as u32
    }

    pub fn puzzle_id(&self) -> u32 {
        self.session.task().id
    }

    pub fn puzzle_name(&self) -> String {
        self.session.task().name.clone()
    }

    /// The player grid as `[{xCoord, yCoord, content}]`.
    pub fn board(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.session.board().cells()).map_err(JsValue::from)
    }

    /// Column clues as `{legend, width, height}`.
    pub fn horizontal_legend(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.session.horizontal_legend()).map_err(JsValue::from)
    }

    /// Row clues as `{legend, width, height}`.
    pub fn vertical_legend(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.session.vertical_legend()).map_err(JsValue::from)
    }

    /// The completion record, `{gameCompleted, id, time, star}`.
    pub fn progress(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.progress()).map_err(JsValue::from)
    }
}
