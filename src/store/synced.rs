use std::fmt;

use crate::io::api::{ApiError, TodoBackend, UpdatePayload};
use crate::model::filter::Filter;
use crate::model::task::{Task, TaskPatch};
use crate::ops::task_ops;

use super::{TaskStore, TodoStore};

/// Remote operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    List,
    Create,
    Toggle,
    Update,
    Delete,
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncOp::List => "load todos",
            SyncOp::Create => "add todo",
            SyncOp::Toggle => "toggle todo",
            SyncOp::Update => "update todo",
            SyncOp::Delete => "delete todo",
        })
    }
}

/// A remote call failed; local state was left as it was.
#[derive(Debug, thiserror::Error)]
#[error("could not {op}: {source}")]
pub struct SyncError {
    pub op: SyncOp,
    pub source: ApiError,
}

impl SyncError {
    fn wrap(op: SyncOp) -> impl FnOnce(ApiError) -> SyncError {
        move |source| SyncError { op, source }
    }
}

/// Lifecycle of the initial (or retried) list fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Last fetch failed; holds the message shown next to the retry hint
    Error(String),
}

/// Task store mirroring a remote collection.
///
/// Every mutation is sent to the server first and applied locally only
/// after it succeeds. Operations on ids that are not in the local
/// collection are no-ops and send nothing.
pub struct SyncedStore<B> {
    store: TaskStore,
    backend: B,
    fetch_state: FetchState,
}

impl<B: TodoBackend> SyncedStore<B> {
    pub fn new(backend: B) -> Self {
        SyncedStore {
            store: TaskStore::new(),
            backend,
            fetch_state: FetchState::Idle,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch_state
    }

    pub fn is_loading(&self) -> bool {
        self.fetch_state == FetchState::Loading
    }

    pub fn fetch_error(&self) -> Option<&str> {
        match &self.fetch_state {
            FetchState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Replace local state with the server's collection. On failure the
    /// previous collection is kept and the state becomes `Error`.
    pub fn fetch_all(&mut self) -> Result<(), SyncError> {
        self.fetch_state = FetchState::Loading;
        match self.backend.list() {
            Ok(records) => {
                let tasks: Vec<Task> = records.into_iter().filter_map(|r| r.into_task()).collect();
                tracing::info!(count = tasks.len(), "loaded todos");
                self.store.replace_all(tasks);
                self.fetch_state = FetchState::Loaded;
                Ok(())
            }
            Err(source) => {
                let err = SyncError {
                    op: SyncOp::List,
                    source,
                };
                tracing::warn!(error = %err, "fetch failed");
                self.fetch_state = FetchState::Error(err.to_string());
                Err(err)
            }
        }
    }

    pub fn retry(&mut self) -> Result<(), SyncError> {
        self.fetch_all()
    }

    pub fn add(&mut self, text: &str) -> Result<Option<Task>, SyncError> {
        let Some(text) = task_ops::normalize_text(text) else {
            return Ok(None);
        };
        let created = self.backend.create(text).map_err(SyncError::wrap(SyncOp::Create))?;
        let task = created.into_task(text);
        tracing::debug!(id = %task.id, "created todo");
        self.store.push(task.clone());
        Ok(Some(task))
    }

    pub fn toggle(&mut self, id: &str) -> Result<bool, SyncError> {
        if self.store.get(id).is_none() {
            return Ok(false);
        }
        self.backend.toggle(id).map_err(SyncError::wrap(SyncOp::Toggle))?;
        Ok(self.store.toggle(id))
    }

    pub fn delete(&mut self, id: &str) -> Result<bool, SyncError> {
        if self.store.get(id).is_none() {
            return Ok(false);
        }
        self.backend.delete(id).map_err(SyncError::wrap(SyncOp::Delete))?;
        Ok(self.store.delete(id))
    }

    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> Result<bool, SyncError> {
        if self.store.get(id).is_none() {
            return Ok(false);
        }
        let payload = UpdatePayload::from(patch);
        if payload.is_empty() {
            return Ok(false);
        }
        self.backend
            .update(id, &payload)
            .map_err(SyncError::wrap(SyncOp::Update))?;
        Ok(self.store.update(id, patch))
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn filter(&self) -> Filter {
        self.store.filter()
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
    }
}
