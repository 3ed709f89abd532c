//! Catalog client: fetching, caching, and lookup of puzzle records.
//!
//! The HTTP stack is an opaque collaborator injected behind
//! [`Transport`] — the browser hands over `fetch` response bodies, the
//! terminal client reads a saved response from disk, and tests use
//! [`MockTransport`]. The client owns URL construction, the contract
//! checks, the fetched task list, and a single-flight guard that
//! ignores a new fetch for a resource while one is in flight.

use crate::api::{self, ApiError, NewsItem, Task};
use std::collections::{HashMap, HashSet};

/// Default site the catalog is served from.
pub const DEFAULT_BASE_URL: &str = "http://crossw.ru";
pub const API_TASKS: &str = "/api/tasks.php";
pub const API_TASK: &str = "/api/task.php";
pub const API_NEWS: &str = "/api/news.php";

/// A logical resource a fetch can be in flight for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    TaskList,
    Task(u32),
    News,
}

/// Tracks which logical resources have an outstanding fetch. There is
/// no request cancellation; the guard only suppresses duplicates.
#[derive(Debug, Default)]
pub struct FetchGuard {
    in_flight: HashSet<Resource>,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the resource. Returns false when a fetch for it is
    /// already in flight, in which case the caller must not start
    /// another.
    pub fn begin(&mut self, resource: Resource) -> bool {
        self.in_flight.insert(resource)
    }

    pub fn finish(&mut self, resource: Resource) {
        self.in_flight.remove(&resource);
    }

    pub fn is_in_flight(&self, resource: Resource) -> bool {
        self.in_flight.contains(&resource)
    }
}

/// A completed transport exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// The body, provided the status is OK.
    pub fn into_body(self) -> Result<String, ApiError> {
        if (200..300).contains(&self.status) {
            Ok(self.body)
        } else {
            Err(ApiError::Status(self.status))
        }
    }
}

/// Minimal transport contract: issue a GET, return status and body.
pub trait Transport {
    fn get(&self, url: &str) -> Result<TransportResponse, ApiError>;
}

pub fn tasks_url(base_url: &str, count: u32) -> String {
    format!("{}{}?count={}", base_url, API_TASKS, count)
}

pub fn task_url(base_url: &str, id: u32) -> String {
    format!("{}{}?task={}", base_url, API_TASK, id)
}

pub fn news_url(base_url: &str) -> String {
    format!("{}{}", base_url, API_NEWS)
}

/// Catalog client over an injected transport.
pub struct CatalogClient<T: Transport> {
    transport: T,
    base_url: String,
    tasks: Vec<Task>,
    guard: FetchGuard,
}

impl<T: Transport> CatalogClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_base_url(transport, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            tasks: Vec::new(),
            guard: FetchGuard::new(),
        }
    }

    /// The most recently fetched (or restored) task list.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Restores a previously cached task list without a fetch.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn get_task_by_id(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn guard_mut(&mut self) -> &mut FetchGuard {
        &mut self.guard
    }

    /// Fetches the task list and replaces the held catalog.
    pub fn fetch_tasks(&mut self, count: u32) -> Result<&[Task], ApiError> {
        if !self.guard.begin(Resource::TaskList) {
            return Err(ApiError::InFlight);
        }
        let result = self
            .transport
            .get(&tasks_url(&self.base_url, count))
            .and_then(TransportResponse::into_body)
            .and_then(|body| api::parse_task_list(&body));
        self.guard.finish(Resource::TaskList);

        self.tasks = result?;
        Ok(&self.tasks)
    }

    /// Fetches one puzzle and folds it into the held list.
    pub fn fetch_task(&mut self, id: u32) -> Result<Task, ApiError> {
        if !self.guard.begin(Resource::Task(id)) {
            return Err(ApiError::InFlight);
        }
        let result = self
            .transport
            .get(&task_url(&self.base_url, id))
            .and_then(TransportResponse::into_body)
            .and_then(|body| api::parse_task(&body));
        self.guard.finish(Resource::Task(id));

        let task = result?;
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => self.tasks.push(task.clone()),
        }
        Ok(task)
    }

    pub fn fetch_news(&mut self) -> Result<Vec<NewsItem>, ApiError> {
        if !self.guard.begin(Resource::News) {
            return Err(ApiError::InFlight);
        }
        let result = self
            .transport
            .get(&news_url(&self.base_url))
            .and_then(TransportResponse::into_body)
            .and_then(|body| api::parse_news(&body));
        self.guard.finish(Resource::News);
        result
    }
}

/// In-memory transport for tests: canned responses keyed by URL.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<String, TransportResponse>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&mut self, url: impl Into<String>, response: TransportResponse) {
        self.responses.insert(url.into(), response);
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<TransportResponse, ApiError> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::Transport(format!("no route to {}", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_BODY: &str = r#"{
        "tasks": [
            {"id": "1", "name": "Dot", "task": ["1"], "width": "1", "height": "1",
             "image_preview": "", "image_solved": ""},
            {"id": "2", "name": "Pair", "task": ["1", "1"], "width": "2", "height": "1",
             "image_preview": "", "image_solved": ""}
        ],
        "success": "true"
    }"#;

    fn client_with_list() -> CatalogClient<MockTransport> {
        let mut transport = MockTransport::new();
        transport.respond(
            tasks_url(DEFAULT_BASE_URL, 50),
            TransportResponse::ok(LIST_BODY),
        );
        CatalogClient::new(transport)
    }

    #[test]
    fn test_fetch_tasks_and_lookup() {
        let mut client = client_with_list();
        assert_eq!(client.fetch_tasks(50).unwrap().len(), 2);
        assert_eq!(client.get_task_by_id(2).unwrap().name, "Pair");
        assert!(client.get_task_by_id(9).is_none());
    }

    #[test]
    fn test_non_ok_status_is_an_error() {
        let mut transport = MockTransport::new();
        transport.respond(
            tasks_url(DEFAULT_BASE_URL, 50),
            TransportResponse {
                status: 500,
                body: String::new(),
            },
        );
        let mut client = CatalogClient::new(transport);
        assert_eq!(client.fetch_tasks(50), Err(ApiError::Status(500)));
        assert!(client.tasks().is_empty());
    }

    #[test]
    fn test_backend_failure_is_an_error() {
        let mut transport = MockTransport::new();
        transport.respond(
            tasks_url(DEFAULT_BASE_URL, 50),
            TransportResponse::ok(r#"{"success": "false"}"#),
        );
        let mut client = CatalogClient::new(transport);
        assert_eq!(client.fetch_tasks(50), Err(ApiError::Failure));
    }

    #[test]
    fn test_fetch_task_upserts_into_list() {
        let mut transport = MockTransport::new();
        transport.respond(
            task_url(DEFAULT_BASE_URL, 5),
            TransportResponse::ok(
                r#"{"id": "5", "name": "Solo", "task": ["1"], "width": "1", "height": "1",
                    "image_preview": "", "image_solved": "", "success": "true"}"#,
            ),
        );
        let mut client = CatalogClient::new(transport);
        let task = client.fetch_task(5).unwrap();
        assert_eq!(task.name, "Solo");
        assert_eq!(client.tasks().len(), 1);
    }

    #[test]
    fn test_single_flight_guard() {
        let mut guard = FetchGuard::new();
        assert!(guard.begin(Resource::TaskList));
        assert!(!guard.begin(Resource::TaskList));
        // Other resources are independent.
        assert!(guard.begin(Resource::Task(1)));
        guard.finish(Resource::TaskList);
        assert!(guard.begin(Resource::TaskList));
    }

    #[test]
    fn test_fetch_while_in_flight_is_ignored() {
        let mut client = client_with_list();
        client.guard_mut().begin(Resource::TaskList);
        assert_eq!(client.fetch_tasks(50), Err(ApiError::InFlight));
        // The foreign claim is not released by the rejected call.
        assert!(client.guard_mut().is_in_flight(Resource::TaskList));
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            tasks_url(DEFAULT_BASE_URL, 24),
            "http://crossw.ru/api/tasks.php?count=24"
        );
        assert_eq!(
            task_url(DEFAULT_BASE_URL, 7),
            "http://crossw.ru/api/task.php?task=7"
        );
        assert_eq!(news_url(DEFAULT_BASE_URL), "http://crossw.ru/api/news.php");
    }

    #[test]
    fn test_news_fetch() {
        let mut transport = MockTransport::new();
        transport.respond(
            news_url(DEFAULT_BASE_URL),
            TransportResponse::ok(r#"{"news": [{"date": "2024-02-01", "text": "hi"}], "success": true}"#),
        );
        let mut client = CatalogClient::new(transport);
        assert_eq!(client.fetch_news().unwrap().len(), 1);
    }
}
