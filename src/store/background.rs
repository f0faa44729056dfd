//! Remote store for interactive use.
//!
//! A worker thread owns the `SyncedStore` and runs one request at a time.
//! The caller keeps a mirror of the collection that is replaced with the
//! worker's state as each reply arrives, so submitting a mutation never
//! waits on the network.

use std::sync::mpsc;
use std::thread;

use crate::io::api::{TodoBackend, UpdatePayload};
use crate::model::filter::Filter;
use crate::model::task::{Task, TaskPatch};
use crate::ops::task_ops;

use super::TodoStore;
use super::synced::{FetchState, SyncError, SyncOp, SyncedStore};

enum Request {
    Fetch,
    Add(String),
    Toggle(String),
    Delete(String),
    Update(String, TaskPatch),
}

/// Worker state after one request
struct Reply {
    fetch: bool,
    tasks: Vec<Task>,
    fetch_state: FetchState,
    error: Option<SyncError>,
}

pub struct BackgroundStore {
    tasks: Vec<Task>,
    filter: Filter,
    fetch_state: FetchState,
    request_tx: mpsc::Sender<Request>,
    reply_rx: mpsc::Receiver<Reply>,
    _handle: thread::JoinHandle<()>,
    /// Requests sent and not yet answered
    pending: usize,
    /// Fetches among `pending`; while any remain the mirror stays `Loading`
    pending_fetches: usize,
}

impl BackgroundStore {
    /// Move `store` onto a worker thread. Nothing is requested until the
    /// first `fetch_all`.
    pub fn spawn<B>(store: SyncedStore<B>) -> Self
    where
        B: TodoBackend + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();
        let tasks = store.tasks().to_vec();
        let fetch_state = store.fetch_state().clone();
        let filter = store.filter();

        let handle = thread::spawn(move || {
            let mut store = store;
            while let Ok(request) = request_rx.recv() {
                let fetch = matches!(request, Request::Fetch);
                let error = run_request(&mut store, request).err();
                let reply = Reply {
                    fetch,
                    tasks: store.tasks().to_vec(),
                    fetch_state: store.fetch_state().clone(),
                    error,
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
            tracing::debug!("sync worker stopped");
        });

        BackgroundStore {
            tasks,
            filter,
            fetch_state,
            request_tx,
            reply_rx,
            _handle: handle,
            pending: 0,
            pending_fetches: 0,
        }
    }

    fn send(&mut self, request: Request) -> bool {
        if self.request_tx.send(request).is_err() {
            tracing::error!("sync worker is not running");
            return false;
        }
        self.pending += 1;
        true
    }

    fn known(&self, id: &str) -> bool {
        task_ops::find_task(&self.tasks, id).is_some()
    }
}

fn run_request<B: TodoBackend>(store: &mut SyncedStore<B>, request: Request) -> Result<(), SyncError> {
    match request {
        Request::Fetch => store.fetch_all(),
        Request::Add(text) => store.add(&text).map(|_| ()),
        Request::Toggle(id) => store.toggle(&id).map(|_| ()),
        Request::Delete(id) => store.delete(&id).map(|_| ()),
        Request::Update(id, patch) => store.update(&id, &patch).map(|_| ()),
    }
}

impl TodoStore for BackgroundStore {
    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn filter(&self) -> Filter {
        self.filter
    }

    fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    fn add(&mut self, text: &str) -> bool {
        let Some(text) = task_ops::normalize_text(text) else {
            return false;
        };
        self.send(Request::Add(text.to_string()))
    }

    fn toggle(&mut self, id: &str) -> bool {
        self.known(id) && self.send(Request::Toggle(id.to_string()))
    }

    fn delete(&mut self, id: &str) -> bool {
        self.known(id) && self.send(Request::Delete(id.to_string()))
    }

    fn update(&mut self, id: &str, patch: &TaskPatch) -> bool {
        if UpdatePayload::from(patch).is_empty() {
            return false;
        }
        self.known(id) && self.send(Request::Update(id.to_string(), patch.clone()))
    }

    fn fetch_state(&self) -> Option<&FetchState> {
        Some(&self.fetch_state)
    }

    fn fetch_all(&mut self) {
        self.fetch_state = FetchState::Loading;
        if self.send(Request::Fetch) {
            self.pending_fetches += 1;
        } else {
            self.fetch_state = FetchState::Error("sync worker is not running".into());
        }
    }

    /// Fetch failures are reported through `fetch_state`, not returned.
    fn poll(&mut self) -> Vec<SyncError> {
        let mut failures = Vec::new();
        while let Ok(reply) = self.reply_rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            if reply.fetch {
                self.pending_fetches = self.pending_fetches.saturating_sub(1);
            }
            self.tasks = reply.tasks;
            if self.pending_fetches == 0 {
                self.fetch_state = reply.fetch_state;
            }
            match reply.error {
                Some(err) if err.op == SyncOp::List => {}
                Some(err) => failures.push(err),
                None => {}
            }
        }
        failures
    }

    fn pending(&self) -> usize {
        self.pending
    }
}
