//! Per-row interaction state.
//!
//! A row is either idle or has one mutation in flight (`pending`). Editing is
//! orthogonal to that and can combine with either: a submitted rename stays
//! "editing" until it resolves. Which row may edit is decided by the list,
//! not here.

use thiserror::Error;

use crate::dispatch::Mutation;
use crate::models::{Task, TaskId};

/// Interaction state of one displayed row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowViewState {
    /// This row holds the list's editing id.
    pub editing: bool,
    /// A mutation submitted from this row has not resolved yet.
    pub pending: bool,
}

/// User input on a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEvent {
    /// Click on the name area.
    ClickName,
    /// Checkbox toggle.
    ToggleDone,
    /// Cancel button of the edit form.
    Cancel,
    /// Submit button of the edit form.
    SubmitUpdate { name: String },
    /// Delete button.
    Delete,
}

/// What the list should do in response to an accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEffect {
    StartEditing,
    StopEditing,
    Submit(Mutation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("a mutation from this row is still in flight")]
    Pending,

    #[error("row is not being edited")]
    NotEditing,

    #[error("task {0} is being edited and has an update in flight")]
    EditLocked(TaskId),
}

impl RowViewState {
    pub fn is_idle(&self) -> bool {
        !self.pending
    }

    pub fn checkbox_enabled(&self) -> bool {
        !self.pending
    }

    pub fn edit_controls_enabled(&self) -> bool {
        self.editing && !self.pending
    }

    /// Decide how `event` on the row showing `task` is handled.
    ///
    /// Every control is disabled while a mutation from this row is pending,
    /// so nothing can be issued twice.
    pub fn handle(&self, task: &Task, event: RowEvent) -> Result<RowEffect, RowRejection> {
        if self.pending {
            return Err(RowRejection::Pending);
        }

        match event {
            RowEvent::ClickName => Ok(RowEffect::StartEditing),
            RowEvent::ToggleDone => Ok(RowEffect::Submit(Mutation::SetDone {
                id: task.id,
                done: !task.done,
            })),
            RowEvent::Cancel if self.editing => Ok(RowEffect::StopEditing),
            RowEvent::SubmitUpdate { name } if self.editing => {
                Ok(RowEffect::Submit(Mutation::Rename { id: task.id, name }))
            }
            RowEvent::Cancel | RowEvent::SubmitUpdate { .. } => Err(RowRejection::NotEditing),
            RowEvent::Delete => Ok(RowEffect::Submit(Mutation::Delete { id: task.id })),
        }
    }
}
