//! Shared fixtures for the grid integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use datagrid::{
    ColumnDef, DataSource, FetchError, FetchRequest, GridEvent, GridObserver, MemorySource,
    PageResult,
};

/// `count` user records with ids 1..=count.
pub fn users(count: u32) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("user-{:02}", i),
                "email": format!("user{}@example.com", i),
            })
        })
        .collect()
}

/// Records keyed "a", "b", ... in order.
pub fn letters(ids: &[&str]) -> Vec<Value> {
    ids.iter()
        .map(|id| json!({"id": id, "name": id.to_uppercase()}))
        .collect()
}

pub fn columns() -> Vec<ColumnDef<Value>> {
    vec![
        ColumnDef::field("Name", "name"),
        ColumnDef::field("Email", "email"),
    ]
}

pub fn ids(rows: &[Value]) -> Vec<String> {
    rows.iter()
        .map(|r| r["id"].to_string().trim_matches('"').to_string())
        .collect()
}

/// Memory source that records every request and can be told to fail.
#[derive(Clone)]
pub struct RecordingSource {
    pub inner: MemorySource<Value>,
    requests: Arc<Mutex<Vec<FetchRequest>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            inner: MemorySource::new(records),
            requests: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<FetchRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn fetch_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataSource<Value> for RecordingSource {
    async fn fetch(&self, request: FetchRequest) -> Result<PageResult<Value>, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::backend_status(500, "boom"));
        }
        Ok(self.inner.page(&request))
    }
}

type Reply = oneshot::Sender<Result<PageResult<Value>, FetchError>>;

/// Source whose fetches stay pending until the test resolves them, in any order.
#[derive(Clone, Default)]
pub struct GatedSource {
    pending: Arc<Mutex<VecDeque<(FetchRequest, Reply)>>>,
}

impl GatedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Yield to spawned tasks until `count` fetches are waiting.
    pub async fn wait_for(&self, count: usize) {
        for _ in 0..1000 {
            if self.pending() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} pending fetches, got {}", count, self.pending());
    }

    /// Resolve the pending fetch for `page`.
    pub fn resolve(&self, page: u32, result: Result<PageResult<Value>, FetchError>) {
        let mut pending = self.pending.lock().unwrap();
        let index = pending
            .iter()
            .position(|(request, _)| request.page == page)
            .expect("no pending fetch for page");
        let (_, reply) = pending.remove(index).unwrap();
        let _ = reply.send(result);
    }

    /// Resolve the most recently issued pending fetch.
    pub fn resolve_newest(&self, result: Result<PageResult<Value>, FetchError>) {
        let (_, reply) = self
            .pending
            .lock()
            .unwrap()
            .pop_back()
            .expect("no pending fetch");
        let _ = reply.send(result);
    }
}

#[async_trait]
impl DataSource<Value> for GatedSource {
    async fn fetch(&self, request: FetchRequest) -> Result<PageResult<Value>, FetchError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back((request, tx));
        rx.await
            .unwrap_or_else(|_| Err(FetchError::other("gate dropped")))
    }
}

/// Observer that keeps every event.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<GridEvent>>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<GridEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn contains(&self, event: &GridEvent) -> bool {
        self.events.lock().unwrap().contains(event)
    }
}

impl GridObserver for EventLog {
    fn on_event(&self, _grid: &str, event: &GridEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
