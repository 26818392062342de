use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a task. Immutable after creation.
pub type TaskId = i64;

/// A single entry in the task list.
///
/// `id` is the only stable handle; `name` and `done` are fully replaceable
/// through mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Never empty.
    pub name: String,
    pub done: bool,
}
