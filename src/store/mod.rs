//! The task collection and the operations the front-ends call on it.
//!
//! `TaskStore` keeps everything in memory. `SyncedStore` mirrors a remote
//! collection and only changes local state after the server has accepted
//! a mutation; the CLI drives it directly. `BackgroundStore` runs a
//! `SyncedStore` on a worker thread for the TUI. The TUI holds either one
//! as a `TodoStore`.

pub mod background;
pub mod synced;

use chrono::Utc;

use crate::model::filter::Filter;
use crate::model::task::{Task, TaskPatch};
use crate::ops::task_ops::{self, TaskCounts};

pub use background::BackgroundStore;
pub use synced::{FetchState, SyncError, SyncOp, SyncedStore};

/// Common surface of the local and background stores
pub trait TodoStore {
    /// Full collection in insertion order
    fn tasks(&self) -> &[Task];
    fn filter(&self) -> Filter;
    fn set_filter(&mut self, filter: Filter);

    /// Add a task from raw input. Returns false for blank input. Remote
    /// stores queue the request and apply it once the server confirms.
    fn add(&mut self, text: &str) -> bool;
    /// Returns false for unknown ids
    fn toggle(&mut self, id: &str) -> bool;
    fn delete(&mut self, id: &str) -> bool;
    fn update(&mut self, id: &str, patch: &TaskPatch) -> bool;

    /// Fetch lifecycle; `None` for stores without remote state.
    fn fetch_state(&self) -> Option<&FetchState> {
        None
    }

    /// Start reloading the remote collection. No-op for local stores.
    fn fetch_all(&mut self) {}

    /// Apply answered requests; returns the mutations that failed.
    fn poll(&mut self) -> Vec<SyncError> {
        Vec::new()
    }

    /// Requests still waiting on the server
    fn pending(&self) -> usize {
        0
    }

    fn get(&self, id: &str) -> Option<&Task> {
        task_ops::find_task(self.tasks(), id)
    }

    fn filtered_view(&self, filter: Filter) -> Vec<Task> {
        task_ops::filtered_view(self.tasks(), filter)
    }

    /// Tasks selected by the current filter
    fn visible(&self) -> Vec<Task> {
        self.filtered_view(self.filter())
    }

    fn counts(&self) -> TaskCounts {
        task_ops::count_tasks(self.tasks())
    }
}

/// In-memory task collection
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: Filter,
    /// Last generated id value; ids never repeat within a store
    last_id: i64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        TaskStore {
            tasks,
            ..Default::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Append a new task. Blank text is ignored and returns `None`.
    pub fn add(&mut self, text: &str) -> Option<Task> {
        let text = task_ops::normalize_text(text)?;
        let task = Task::new(self.next_id(), text);
        self.tasks.push(task.clone());
        Some(task)
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        task_ops::toggle_task(&mut self.tasks, id)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        task_ops::remove_task(&mut self.tasks, id)
    }

    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> bool {
        task_ops::update_task(&mut self.tasks, id, patch)
    }

    /// Replace the whole collection (e.g. after a remote fetch)
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Append an already-built task
    pub(crate) fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Time-derived id: current epoch milliseconds, bumped past the last
    /// issued value and any id already present.
    fn next_id(&mut self) -> String {
        let mut value = Utc::now().timestamp_millis().max(self.last_id + 1);
        while task_ops::find_task(&self.tasks, &value.to_string()).is_some() {
            value += 1;
        }
        self.last_id = value;
        value.to_string()
    }
}

impl TodoStore for TaskStore {
    fn tasks(&self) -> &[Task] {
        TaskStore::tasks(self)
    }

    fn filter(&self) -> Filter {
        self.filter
    }

    fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    fn add(&mut self, text: &str) -> bool {
        TaskStore::add(self, text).is_some()
    }

    fn toggle(&mut self, id: &str) -> bool {
        TaskStore::toggle(self, id)
    }

    fn delete(&mut self, id: &str) -> bool {
        TaskStore::delete(self, id)
    }

    fn update(&mut self, id: &str, patch: &TaskPatch) -> bool {
        TaskStore::update(self, id, patch)
    }
}
