//! Catalog and news ingestion for the browser.
//!
//! JS owns the actual `fetch`; the response status and body land here
//! for contract checking, caching, and lookup. The begin/ingest/abort
//! trio implements the single-flight guard: a `begin_*` returning false
//! means a fetch for that resource is already outstanding and the
//! caller must not start another.

use nonogram_core::storage::{self, TASKS_KEY};
use nonogram_core::{api, FetchGuard, Resource, Task, TransportResponse};
use wasm_bindgen::prelude::*;

use crate::storage::BrowserStorage;

#[wasm_bindgen]
pub struct CatalogStore {
    store: BrowserStorage,
    tasks: Vec<Task>,
    guard: FetchGuard,
    base_url: String,
}

#[wasm_bindgen]
impl CatalogStore {
    /// Starts from the cached catalog, when one survives in
    /// localStorage.
    #[wasm_bindgen(constructor)]
    pub fn new() -> CatalogStore {
        let store = BrowserStorage::new();
        let tasks = storage::load_json::<BrowserStorage, Vec<Task>>(&store, TASKS_KEY)
            .ok()
            .flatten()
            .unwrap_or_default();
        CatalogStore {
            store,
            tasks,
            guard: FetchGuard::new(),
            base_url: nonogram_core::catalog::DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        self.base_url = base_url.trim_end_matches('/').to_string();
    }

    // ==================== task list ====================

    pub fn tasks_url(&self, count: u32) -> String {
        nonogram_core::catalog::tasks_url(&self.base_url, count)
    }

    pub fn begin_fetch_tasks(&mut self) -> bool {
        self.guard.begin(Resource::TaskList)
    }

    /// Releases the guard after a transport-level failure.
    pub fn abort_fetch_tasks(&mut self) {
        self.guard.finish(Resource::TaskList);
    }

    /// Ingests the list endpoint response; returns the catalog size.
    pub fn ingest_tasks(&mut self, status: u16, body: &str) -> Result<u32, JsValue> {
        self.guard.finish(Resource::TaskList);
        let tasks = TransportResponse {
            status,
            body: body.to_string(),
        }
        .into_body()
        .and_then(|body| api::parse_task_list(&body))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        if storage::save_json(&mut self.store, TASKS_KEY, &tasks).is_err() {
            crate::warn("failed to cache the task list");
        }
        self.tasks = tasks;
        Ok(self.tasks.len() as u32)
    }

    // ==================== single task ====================

    pub fn task_url(&self, id: u32) -> String {
        nonogram_core::catalog::task_url(&self.base_url, id)
    }

    pub fn begin_fetch_task(&mut self, id: u32) -> bool {
        self.guard.begin(Resource::Task(id))
    }

    pub fn abort_fetch_task(&mut self, id: u32) {
        self.guard.finish(Resource::Task(id));
    }

    /// Ingests a single-task response, caching the record under its
    /// per-puzzle key.
    pub fn ingest_task(&mut self, id: u32, status: u16, body: &str) -> Result<(), JsValue> {
        self.guard.finish(Resource::Task(id));
        let task = TransportResponse {
            status,
            body: body.to_string(),
        }
        .into_body()
        .and_then(|body| api::parse_task(&body))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        if storage::save_json(&mut self.store, &storage::task_key(task.id), &task).is_err() {
            crate::warn("failed to cache the task record");
        }
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        Ok(())
    }

    // ==================== news ====================

    pub fn news_url(&self) -> String {
        nonogram_core::catalog::news_url(&self.base_url)
    }

    pub fn begin_fetch_news(&mut self) -> bool {
        self.guard.begin(Resource::News)
    }

    pub fn abort_fetch_news(&mut self) {
        self.guard.finish(Resource::News);
    }

    /// Ingests the news response and returns the entries for display.
    pub fn ingest_news(&mut self, status: u16, body: &str) -> Result<JsValue, JsValue> {
        self.guard.finish(Resource::News);
        let news = TransportResponse {
            status,
            body: body.to_string(),
        }
        .into_body()
        .and_then(|body| api::parse_news(&body))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&news).map_err(JsValue::from)
    }

    // ==================== lookup ====================

    pub fn count(&self) -> u32 {
        self.tasks.len() as u32
    }

    /// The held catalog as a JS array of task records.
    pub fn tasks(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.tasks).map_err(JsValue::from)
    }

    /// One task record as JSON, from the held list or the per-puzzle
    /// cache — the input for the `NonogramGame` constructor.
    pub fn task_json(&self, id: u32) -> Option<String> {
        let cached;
        let task = match self.tasks.iter().find(|t| t.id == id) {
            Some(task) => task,
            None => {
                cached = storage::load_json::<BrowserStorage, Task>(
                    &self.store,
                    &storage::task_key(id),
                )
                .ok()
                .flatten()?;
                &cached
            }
        };
        serde_json::to_string(task).ok()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
