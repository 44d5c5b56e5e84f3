//! Scheduler errors

use thiserror::Error;

use super::task::{TaskId, TaskState};

/// Scheduler result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors reported to callers of the scheduler's lookup and spawn APIs.
///
/// Task failures are never reported here; they live in the failed ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The id is unknown, still ready, or resolved into the other ledger.
    ///
    /// `state` is `None` when the scheduler never issued `id`.
    #[error("{id} not found ({})", describe_state(.state))]
    NotFound {
        id: TaskId,
        state: Option<TaskState>,
    },

    /// A spawner was used after its scheduler was dropped.
    #[error("scheduler is gone; spawner is detached")]
    Detached,
}

fn describe_state(state: &Option<TaskState>) -> String {
    match state {
        None => "never registered".to_string(),
        Some(TaskState::Ready) => "still ready".to_string(),
        Some(other) => format!("task {}", other),
    }
}
