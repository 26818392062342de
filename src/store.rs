//! The persistent task store boundary.
//!
//! The store is the single source of truth and the only shared mutable
//! resource. Each operation is an independent single-record write; any
//! atomicity beyond that is the implementation's business.

use thiserror::Error;

use crate::models::{Task, TaskId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Create/read/update/delete of tasks by numeric id.
pub trait TaskStore {
    /// Full, unpaginated read in a display-stable order.
    fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Insert a new task. `done` always starts out `false`.
    fn create_task(&self, name: &str) -> Result<Task, StoreError>;

    fn update_task_name(&self, id: TaskId, name: &str) -> Result<(), StoreError>;

    fn set_task_done(&self, id: TaskId, done: bool) -> Result<(), StoreError>;

    fn delete_task(&self, id: TaskId) -> Result<(), StoreError>;
}
