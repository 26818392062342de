//! Async driver that connects the list controller to a task backend.
//!
//! Each submission is an independent unit of work. The controller lock is
//! only ever held between awaits, so submissions from different rows
//! interleave freely on a single-threaded runtime while each row stays
//! serialized by its own pending state.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use super::list::{ControlError, ListController, ListView, Submission};
use super::row::RowEvent;
use crate::dispatch::{dispatch, DispatchError, Mutation};
use crate::models::{fields_from_pairs, Task, TaskId};
use crate::store::TaskStore;

/// Where the list reads tasks from and sends mutations to.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn list_tasks(&self) -> Result<Vec<Task>, Self::Error>;

    async fn submit(&self, mutation: &Mutation) -> Result<(), Self::Error>;
}

/// In-process backend over a [`TaskStore`].
///
/// Mutations go through the same wire fields and dispatcher a remote server
/// would use, so validation behaves identically.
#[derive(Debug, Clone)]
pub struct LocalBackend<S> {
    store: S,
}

impl<S> LocalBackend<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S> TaskBackend for LocalBackend<S>
where
    S: TaskStore + Send + Sync,
{
    type Error = DispatchError;

    async fn list_tasks(&self) -> Result<Vec<Task>, DispatchError> {
        self.store.list_tasks().map_err(DispatchError::from)
    }

    async fn submit(&self, mutation: &Mutation) -> Result<(), DispatchError> {
        dispatch(&self.store, &fields_from_pairs(mutation.to_fields()))
    }
}

#[derive(Debug, Error)]
pub enum ActError<E: std::error::Error + 'static> {
    /// The event was refused locally; nothing was sent.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// The backend rejected the mutation. The row has been released.
    #[error("mutation failed: {0}")]
    Mutation(#[source] E),

    /// The mutation was applied but the list could not be re-read.
    #[error("refresh failed: {0}")]
    Refresh(#[source] E),
}

/// A task list bound to a backend.
pub struct TaskList<B> {
    backend: B,
    state: Mutex<ListController>,
}

impl<B: TaskBackend> TaskList<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(ListController::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ListController) -> T) -> T {
        let mut state = self.state.lock().expect("list state lock poisoned");
        f(&mut state)
    }

    pub fn view(&self) -> ListView {
        self.with_state(|state| state.view())
    }

    pub fn editing_id(&self) -> Option<TaskId> {
        self.with_state(|state| state.editing_id())
    }

    /// Read the full list and rebuild every row from it.
    ///
    /// Whichever refresh lands last determines what is displayed.
    pub async fn refresh(&self) -> Result<(), B::Error> {
        let tasks = self.backend.list_tasks().await?;
        tracing::debug!(count = tasks.len(), "Reconciling task list");
        self.with_state(|state| state.reconcile(tasks));
        Ok(())
    }

    /// Handle a row event, sending and awaiting its mutation if it has one.
    pub async fn act(&self, id: TaskId, event: RowEvent) -> Result<(), ActError<B::Error>> {
        match self.with_state(|state| state.handle(id, event))? {
            Some(submission) => self.run(submission).await,
            None => Ok(()),
        }
    }

    /// Submit the "add task" form.
    pub async fn add(&self, name: impl Into<String>) -> Result<(), ActError<B::Error>> {
        let submission = self.with_state(|state| state.submit_new(name.into()))?;
        self.run(submission).await
    }

    async fn run(&self, submission: Submission) -> Result<(), ActError<B::Error>> {
        let Submission { ticket, mutation } = submission;
        let result = self.backend.submit(&mutation).await;

        // Released on failure too; the next refresh shows store truth.
        self.with_state(|state| state.resolve(ticket));

        if let Err(e) = result {
            tracing::warn!(
                action = mutation.action().as_str(),
                task_id = ?mutation.task_id(),
                "Mutation failed: {}",
                e
            );
            return Err(ActError::Mutation(e));
        }

        self.refresh().await.map_err(|e| {
            tracing::warn!("Refresh after mutation failed: {}", e);
            ActError::Refresh(e)
        })
    }
}
