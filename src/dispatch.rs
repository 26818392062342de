//! Routing of submitted intents to store operations.
//!
//! Every accepted request results in exactly one store write. Validation runs
//! before the store is touched, so a rejected request never leaves a partial
//! mutation behind. The dispatcher keeps no state between calls.

use serde_json::Value;
use thiserror::Error;

use crate::models::{Fields, TaskId};
use crate::store::{StoreError, TaskStore};
use crate::validation::{validate_id, validate_name, ValidationError};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown action")]
    UnknownAction,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DispatchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound(_)))
    }
}

/// The `action` discriminator of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    Done,
    Undone,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Done => "done",
            Self::Undone => "undone",
            Self::Delete => "delete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Self::Add),
            "update" => Some(Self::Update),
            "done" => Some(Self::Done),
            "undone" => Some(Self::Undone),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// A validated intent, ready to be applied to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Add { name: String },
    Rename { id: TaskId, name: String },
    SetDone { id: TaskId, done: bool },
    Delete { id: TaskId },
}

impl Mutation {
    /// Route on `action` and validate the fields that branch needs.
    ///
    /// `id` is checked before `name` when both are required.
    pub fn from_fields(fields: &Fields) -> Result<Self, DispatchError> {
        let action = match fields.get("action") {
            Some(Value::String(s)) => Action::from_str(s),
            _ => None,
        }
        .ok_or(DispatchError::UnknownAction)?;

        let mutation = match action {
            Action::Add => Self::Add {
                name: validate_name(fields)?,
            },
            Action::Update => {
                let id = validate_id(fields)?;
                let name = validate_name(fields)?;
                Self::Rename { id, name }
            }
            Action::Done | Action::Undone => Self::SetDone {
                id: validate_id(fields)?,
                done: action == Action::Done,
            },
            Action::Delete => Self::Delete {
                id: validate_id(fields)?,
            },
        };
        Ok(mutation)
    }

    pub fn action(&self) -> Action {
        match self {
            Self::Add { .. } => Action::Add,
            Self::Rename { .. } => Action::Update,
            Self::SetDone { done: true, .. } => Action::Done,
            Self::SetDone { done: false, .. } => Action::Undone,
            Self::Delete { .. } => Action::Delete,
        }
    }

    /// The task this mutation targets, if it targets an existing one.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::Add { .. } => None,
            Self::Rename { id, .. } | Self::SetDone { id, .. } | Self::Delete { id } => Some(*id),
        }
    }

    /// Wire form of this mutation, as a client would submit it.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("action", self.action().as_str().to_string())];
        if let Some(id) = self.task_id() {
            fields.push(("id", id.to_string()));
        }
        match self {
            Self::Add { name } | Self::Rename { name, .. } => fields.push(("name", name.clone())),
            Self::SetDone { .. } | Self::Delete { .. } => {}
        }
        fields
    }

    /// Perform the single store operation this mutation stands for.
    pub fn apply<S: TaskStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        match self {
            Self::Add { name } => store.create_task(name).map(|_| ()),
            Self::Rename { id, name } => store.update_task_name(*id, name),
            Self::SetDone { id, done } => store.set_task_done(*id, *done),
            Self::Delete { id } => store.delete_task(*id),
        }
    }
}

/// Validate `fields` and apply the resulting mutation to `store`.
///
/// Errors are propagated unchanged; nothing is caught or retried here.
pub fn dispatch<S: TaskStore + ?Sized>(store: &S, fields: &Fields) -> Result<(), DispatchError> {
    let mutation = Mutation::from_fields(fields)?;
    mutation.apply(store)?;
    tracing::info!(
        action = mutation.action().as_str(),
        task_id = ?mutation.task_id(),
        "Applied mutation"
    );
    Ok(())
}
