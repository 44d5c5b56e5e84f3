//! Task definitions for the scheduler.
//!
//! A task pairs a scheduler-issued identity with the coroutine it owns.
//! Tasks have no behavior of their own; the [`Scheduler`](super::Scheduler)
//! drives them.

use std::cell::Cell;
use std::fmt;

use serde::Serialize;

use crate::runtime::coroutine::{BoxCoroutine, Outcome};

/// Unique task identifier.
///
/// Ids are issued by one scheduler and are never reused by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub usize);

impl TaskId {
    /// Get the inner value.
    #[inline]
    pub fn inner(&self) -> usize {
        self.0
    }
}

impl From<usize> for TaskId {
    fn from(val: usize) -> Self {
        Self(val)
    }
}

impl From<TaskId> for usize {
    fn from(val: TaskId) -> Self {
        val.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// Where a task currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Waiting in the ready queue for its next resumption.
    Ready,
    /// Recorded in the completed ledger.
    Completed,
    /// Recorded in the failed ledger.
    Failed,
    /// Panicked mid-resumption; its coroutine is gone.
    Abandoned,
}

impl fmt::Display for TaskState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            TaskState::Ready => "ready",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Abandoned => "abandoned",
        };
        f.write_str(name)
    }
}

/// A live task: identity plus exclusive ownership of one coroutine.
pub struct Task<T, E> {
    id: TaskId,
    coroutine: BoxCoroutine<T, E>,
    resumptions: usize,
}

impl<T, E> fmt::Debug for Task<T, E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("resumptions", &self.resumptions)
            .finish_non_exhaustive()
    }
}

impl<T, E> Task<T, E> {
    /// Wrap a coroutine under the given id.
    pub fn new(
        id: TaskId,
        coroutine: BoxCoroutine<T, E>,
    ) -> Self {
        Self {
            id,
            coroutine,
            resumptions: 0,
        }
    }

    /// Get the task ID.
    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// How many times this task has been resumed so far.
    #[inline]
    pub fn resumptions(&self) -> usize {
        self.resumptions
    }

    /// Resume the owned coroutine exactly once.
    #[inline]
    pub fn resume(&mut self) -> Outcome<T, E> {
        self.resumptions += 1;
        self.coroutine.resume()
    }
}

/// Source of strictly increasing task ids, scoped to one scheduler.
#[derive(Debug, Default)]
pub struct TaskIdGenerator {
    next_id: Cell<usize>,
}

impl TaskIdGenerator {
    /// Create a new task ID generator starting at zero.
    #[inline]
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
        }
    }

    /// Generate the next task ID.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> TaskId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        TaskId(id)
    }

    /// Whether `id` has been handed out by this generator.
    #[inline]
    pub fn has_issued(
        &self,
        id: TaskId,
    ) -> bool {
        id.0 < self.next_id.get()
    }

    /// Number of ids issued so far.
    #[inline]
    pub fn issued(&self) -> usize {
        self.next_id.get()
    }
}
