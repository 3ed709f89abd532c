//! WebAssembly nonogram game for the browser.
//!
//! Rendering stays on the JS side; this crate owns board state,
//! localStorage persistence, and the backend response contract. The
//! page constructs a [`NonogramGame`] per puzzle, forwards pointer
//! events into it, and reads state back through the getters. Catalog
//! and news fetches are issued by JS `fetch` and their bodies handed to
//! [`CatalogStore`] for contract checking and caching.

use wasm_bindgen::prelude::*;

mod catalog;
mod game;
mod storage;


pub use catalog::CatalogStore;
pub use game::NonogramGame;
pub use storage::BrowserStorage;

// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

pub(crate) fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
