//! The list view-model.
//!
//! Holds the tasks as last fetched, the single editing id, and the table of
//! in-flight submissions keyed by row. Row states are derived from these on
//! every [`ListController::view`]; nothing else survives a refetch.

use std::collections::HashMap;

use thiserror::Error;

use super::row::{RowEffect, RowEvent, RowRejection, RowViewState};
use crate::dispatch::{Action, Mutation};
use crate::models::{Task, TaskId};

/// Identifies a form that can have a submission in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// The "add task" form above the list.
    NewTask,
    Task(TaskId),
}

/// Handle for one in-flight submission. Returned to [`ListController::resolve`]
/// once the request has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    key: RowKey,
    seq: u64,
    action: Action,
}

impl Ticket {
    pub fn key(&self) -> RowKey {
        self.key
    }

    pub fn action(&self) -> Action {
        self.action
    }
}

/// A mutation the list has accepted and marked pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: Ticket,
    pub mutation: Mutation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("task {0} is not in the list")]
    UnknownRow(TaskId),

    #[error("a new task is already being added")]
    AddPending,

    #[error(transparent)]
    Rejected(#[from] RowRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub task: Task,
    pub state: RowViewState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Nothing was fetched; render the "no tasks" placeholder.
    Empty,
    Rows(Vec<RowView>),
}

#[derive(Debug, Default)]
pub struct ListController {
    tasks: Vec<Task>,
    editing_id: Option<TaskId>,
    in_flight: HashMap<RowKey, Ticket>,
    next_seq: u64,
}

impl ListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn editing_id(&self) -> Option<TaskId> {
        self.editing_id
    }

    pub fn is_pending(&self, key: RowKey) -> bool {
        self.in_flight.contains_key(&key)
    }

    fn has_update_in_flight(&self, id: TaskId) -> bool {
        self.in_flight
            .get(&RowKey::Task(id))
            .is_some_and(|ticket| ticket.action == Action::Update)
    }

    pub fn row_state(&self, id: TaskId) -> RowViewState {
        RowViewState {
            editing: self.editing_id == Some(id),
            pending: self.is_pending(RowKey::Task(id)),
        }
    }

    /// Apply a row event. Returns the submission to send, if the event
    /// produced one; the row is pending from this point on.
    pub fn handle(
        &mut self,
        id: TaskId,
        event: RowEvent,
    ) -> Result<Option<Submission>, ControlError> {
        let task = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(ControlError::UnknownRow(id))?;

        match self.row_state(id).handle(task, event)? {
            RowEffect::StartEditing => {
                if let Some(holder) = self.editing_id.filter(|&holder| holder != id) {
                    // A submitted rename keeps its row editing until it lands.
                    if self.has_update_in_flight(holder) {
                        return Err(RowRejection::EditLocked(holder).into());
                    }
                    tracing::debug!(from = holder, to = id, "Editing moved to another row");
                }
                self.editing_id = Some(id);
                Ok(None)
            }
            RowEffect::StopEditing => {
                self.editing_id = None;
                Ok(None)
            }
            RowEffect::Submit(mutation) => Ok(Some(self.begin(RowKey::Task(id), mutation))),
        }
    }

    /// Submit the "add task" form.
    pub fn submit_new(&mut self, name: String) -> Result<Submission, ControlError> {
        if self.is_pending(RowKey::NewTask) {
            return Err(ControlError::AddPending);
        }
        Ok(self.begin(RowKey::NewTask, Mutation::Add { name }))
    }

    fn begin(&mut self, key: RowKey, mutation: Mutation) -> Submission {
        self.next_seq += 1;
        let ticket = Ticket {
            key,
            seq: self.next_seq,
            action: mutation.action(),
        };
        self.in_flight.insert(key, ticket);
        tracing::debug!(?key, action = mutation.action().as_str(), "Submission pending");
        Submission { ticket, mutation }
    }

    /// Mark a submission as finished, whatever its outcome.
    ///
    /// Releases the row and, if that row held the editing id, ends editing.
    /// Returns `false` for a ticket that is no longer in flight.
    pub fn resolve(&mut self, ticket: Ticket) -> bool {
        if self.in_flight.get(&ticket.key) != Some(&ticket) {
            tracing::debug!(?ticket, "Ignoring stale ticket");
            return false;
        }
        self.in_flight.remove(&ticket.key);

        if let RowKey::Task(id) = ticket.key {
            if self.editing_id == Some(id) {
                self.editing_id = None;
            }
        }
        true
    }

    /// Replace the list with a fresh read from the store.
    pub fn reconcile(&mut self, tasks: Vec<Task>) {
        if let Some(id) = self.editing_id {
            if !tasks.iter().any(|t| t.id == id) {
                self.editing_id = None;
            }
        }
        self.tasks = tasks;
    }

    pub fn view(&self) -> ListView {
        if self.tasks.is_empty() {
            return ListView::Empty;
        }
        ListView::Rows(
            self.tasks
                .iter()
                .map(|task| RowView {
                    task: task.clone(),
                    state: self.row_state(task.id),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: TaskId, name: &str) -> Task {
        Task {
            id,
            name: name.to_string(),
            done: false,
        }
    }

    fn controller() -> ListController {
        let mut list = ListController::new();
        list.reconcile(vec![task(1, "a"), task(2, "b"), task(3, "c")]);
        list
    }

    fn editing_rows(list: &ListController) -> Vec<TaskId> {
        match list.view() {
            ListView::Rows(rows) => rows
                .into_iter()
                .filter(|r| r.state.editing)
                .map(|r| r.task.id)
                .collect(),
            ListView::Empty => vec![],
        }
    }

    #[test]
    fn empty_list_renders_placeholder() {
        assert_eq!(ListController::new().view(), ListView::Empty);
    }

    #[test]
    fn editing_is_exclusive() {
        let mut list = controller();
        list.handle(2, RowEvent::ClickName).unwrap();
        assert_eq!(editing_rows(&list), vec![2]);

        list.handle(1, RowEvent::ClickName).unwrap();
        assert_eq!(editing_rows(&list), vec![1]);
        assert!(!list.row_state(2).editing);
    }

    #[test]
    fn cancel_clears_editing_without_submitting() {
        let mut list = controller();
        list.handle(1, RowEvent::ClickName).unwrap();
        assert_eq!(list.handle(1, RowEvent::Cancel), Ok(None));
        assert_eq!(list.editing_id(), None);
        assert!(!list.is_pending(RowKey::Task(1)));
    }

    #[test]
    fn pending_row_ignores_toggles_and_deletes() {
        let mut list = controller();
        let submission = list.handle(1, RowEvent::ToggleDone).unwrap().unwrap();
        assert_eq!(
            submission.mutation,
            Mutation::SetDone { id: 1, done: true }
        );
        assert!(list.row_state(1).pending);

        for event in [RowEvent::ToggleDone, RowEvent::Delete, RowEvent::ClickName] {
            assert_eq!(
                list.handle(1, event),
                Err(ControlError::Rejected(RowRejection::Pending))
            );
        }

        // Other rows stay interactive.
        assert!(list.handle(2, RowEvent::Delete).unwrap().is_some());
    }

    #[test]
    fn resolving_an_update_ends_editing() {
        let mut list = controller();
        list.handle(3, RowEvent::ClickName).unwrap();
        let submission = list
            .handle(
                3,
                RowEvent::SubmitUpdate {
                    name: "see".to_string(),
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(
            list.row_state(3),
            RowViewState {
                editing: true,
                pending: true
            }
        );

        assert!(list.resolve(submission.ticket));
        assert_eq!(list.row_state(3), RowViewState::default());
        assert_eq!(list.editing_id(), None);
    }

    #[test]
    fn resolving_another_row_keeps_editing() {
        let mut list = controller();
        list.handle(1, RowEvent::ClickName).unwrap();
        let submission = list.handle(2, RowEvent::ToggleDone).unwrap().unwrap();

        list.resolve(submission.ticket);
        assert_eq!(list.editing_id(), Some(1));
    }

    #[test]
    fn editing_holder_with_update_in_flight_locks_other_rows() {
        let mut list = controller();
        list.handle(1, RowEvent::ClickName).unwrap();
        let submission = list
            .handle(
                1,
                RowEvent::SubmitUpdate {
                    name: "x".to_string(),
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(
            list.handle(2, RowEvent::ClickName),
            Err(ControlError::Rejected(RowRejection::EditLocked(1)))
        );

        list.resolve(submission.ticket);
        assert_eq!(list.handle(2, RowEvent::ClickName), Ok(None));
        assert_eq!(list.editing_id(), Some(2));
    }

    #[test]
    fn editing_holder_with_toggle_in_flight_does_not_lock() {
        let mut list = controller();
        list.handle(1, RowEvent::ClickName).unwrap();
        let submission = list.handle(1, RowEvent::ToggleDone).unwrap().unwrap();
        assert_eq!(submission.ticket.action(), Action::Done);

        assert_eq!(list.handle(2, RowEvent::ClickName), Ok(None));
        assert_eq!(list.editing_id(), Some(2));
        assert_eq!(editing_rows(&list), vec![2]);

        // Row 1 resolving no longer touches row 2's edit mode.
        list.resolve(submission.ticket);
        assert_eq!(list.editing_id(), Some(2));
    }

    #[test]
    fn editing_holder_with_delete_in_flight_does_not_lock() {
        let mut list = controller();
        list.handle(1, RowEvent::ClickName).unwrap();
        list.handle(1, RowEvent::Delete).unwrap().unwrap();

        assert_eq!(list.handle(3, RowEvent::ClickName), Ok(None));
        assert_eq!(list.editing_id(), Some(3));
    }

    #[test]
    fn stale_tickets_are_ignored() {
        let mut list = controller();
        let first = list.handle(1, RowEvent::Delete).unwrap().unwrap();
        assert!(list.resolve(first.ticket));
        assert!(!list.resolve(first.ticket));
    }

    #[test]
    fn add_form_has_its_own_pending_state() {
        let mut list = controller();
        let submission = list.submit_new("d".to_string()).unwrap();
        assert_eq!(submission.ticket.key(), RowKey::NewTask);
        assert_eq!(
            list.submit_new("e".to_string()),
            Err(ControlError::AddPending)
        );
        assert!(list.handle(1, RowEvent::ToggleDone).is_ok());

        list.resolve(submission.ticket);
        assert!(list.submit_new("e".to_string()).is_ok());
    }

    #[test]
    fn unknown_rows_are_rejected() {
        let mut list = controller();
        assert_eq!(
            list.handle(99, RowEvent::ClickName),
            Err(ControlError::UnknownRow(99))
        );
    }

    #[test]
    fn reconcile_rebuilds_rows_from_fresh_tasks() {
        let mut list = controller();
        list.handle(2, RowEvent::ClickName).unwrap();
        list.reconcile(vec![task(2, "renamed"), task(4, "d")]);

        let ListView::Rows(rows) = list.view() else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].task.name, "renamed");
        assert!(rows[0].state.editing);
        assert!(!rows[1].state.editing);
    }

    #[test]
    fn reconcile_drops_editing_for_vanished_rows() {
        let mut list = controller();
        list.handle(2, RowEvent::ClickName).unwrap();
        list.reconcile(vec![task(1, "a")]);
        assert_eq!(list.editing_id(), None);

        list.reconcile(vec![]);
        assert_eq!(list.view(), ListView::Empty);
    }
}
