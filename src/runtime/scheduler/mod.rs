//! Cooperative task scheduler
//!
//! [`Scheduler`] drives registered coroutines round-robin on the calling
//! thread until none is ready. Each resumption's [`Outcome`] decides where
//! the task goes next:
//!
//! - `Suspended`: back of the ready queue
//! - `Completed(value)`: completed ledger
//! - `Failed(error)`: failed ledger; other tasks are unaffected
//!
//! The ready queue, both ledgers and the abandoned list partition the ids
//! the scheduler has issued. A task lands in the abandoned list only when its
//! coroutine panics and the host catches the unwind; panics are not turned
//! into failures. Resumption order depends only on submission order and on how
//! often each coroutine suspends.
//!
//! A coroutine that never stops suspending keeps
//! [`run_to_completion`](Scheduler::run_to_completion) from returning.

pub mod errors;
pub mod ledger;
pub mod queue;
pub mod task;

pub use errors::{SchedulerError, SchedulerResult};
pub use ledger::Ledger;
pub use queue::TaskQueue;
pub use task::{Task, TaskId, TaskIdGenerator, TaskState};

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, error};

use crate::runtime::coroutine::{Coroutine, Outcome, TaskError};

#[cfg(test)]
mod tests;

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ready-queue capacity reserved up front.
    pub initial_capacity: usize,
    /// Emit a debug event for every resumption.
    pub log_resumptions: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            log_resumptions: true,
        }
    }
}

/// Scheduler statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    /// Total tasks added.
    pub tasks_added: usize,
    /// Total resumptions performed.
    pub resumptions: usize,
    /// Resumptions that ended suspended.
    pub suspensions: usize,
    /// Tasks recorded as completed.
    pub tasks_completed: usize,
    /// Tasks recorded as failed.
    pub tasks_failed: usize,
}

/// How a single resumption ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumptionKind {
    Suspended,
    Completed,
    Failed,
}

/// Report of one loop iteration; see [`Scheduler::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resumption {
    pub id: TaskId,
    pub kind: ResumptionKind,
}

/// State reachable from spawners as well as from the scheduler.
struct Shared<T, E> {
    ready: TaskQueue<T, E>,
    ids: TaskIdGenerator,
    draining: Cell<bool>,
}

impl<T, E> Shared<T, E> {
    fn enqueue<C>(
        &self,
        coroutine: C,
    ) -> TaskId
    where
        C: Coroutine<Output = T, Error = E> + 'static,
    {
        let id = self.ids.next();
        self.ready.push(Task::new(id, Box::new(coroutine)));
        id
    }
}

/// Single-threaded round-robin scheduler.
///
/// `T` is the completion value type and `E` the failure type shared by every
/// task the scheduler runs.
pub struct Scheduler<T, E = TaskError> {
    config: SchedulerConfig,
    shared: Rc<Shared<T, E>>,
    completed: Ledger<T>,
    failed: Ledger<E>,
    abandoned: Vec<TaskId>,
    resolution_order: Vec<TaskId>,
    stats: SchedulerStats,
}

impl<T, E> fmt::Debug for Scheduler<T, E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.config)
            .field("ready", &self.shared.ready.ids())
            .field("completed", &self.completed.len())
            .field("failed", &self.failed.len())
            .field("draining", &self.shared.draining.get())
            .finish()
    }
}

impl<T, E> Scheduler<T, E> {
    /// Create an empty scheduler with default config.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create an empty scheduler with custom configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        let shared = Rc::new(Shared {
            ready: TaskQueue::with_capacity(config.initial_capacity),
            ids: TaskIdGenerator::new(),
            draining: Cell::new(false),
        });

        Self {
            config,
            shared,
            completed: Ledger::new(),
            failed: Ledger::new(),
            abandoned: Vec::new(),
            resolution_order: Vec::new(),
            stats: SchedulerStats::default(),
        }
    }

    /// Register a coroutine as a new ready task at the back of the queue.
    pub fn add<C>(
        &mut self,
        coroutine: C,
    ) -> TaskId
    where
        C: Coroutine<Output = T, Error = E> + 'static,
    {
        let id = self.shared.enqueue(coroutine);
        debug!(task = %id, "task added");
        id
    }

    /// A handle through which running coroutines can add tasks.
    #[inline]
    pub fn spawner(&self) -> Spawner<T, E> {
        Spawner {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Resume the task at the front of the ready queue once.
    ///
    /// Returns `None` when no task is ready.
    pub fn step(&mut self) -> Option<Resumption> {
        let mut task = self.shared.ready.pop_front()?;
        let id = task.id();

        if self.config.log_resumptions {
            debug!(task = %id, resumption = task.resumptions() + 1, "running task");
        }

        let guard = AbandonOnUnwind {
            abandoned: &mut self.abandoned,
            id,
        };
        let outcome = task.resume();
        guard.disarm();
        self.stats.resumptions += 1;

        let kind = match outcome {
            Outcome::Suspended => {
                self.stats.suspensions += 1;
                if self.config.log_resumptions {
                    debug!(task = %id, "task suspended");
                }
                // Anything spawned during the resumption is already queued
                // ahead of this task.
                self.shared.ready.push(task);
                ResumptionKind::Suspended
            }
            Outcome::Completed(value) => {
                self.stats.tasks_completed += 1;
                debug!(task = %id, resumptions = task.resumptions(), "task completed");
                self.completed.record(id, value);
                self.resolution_order.push(id);
                ResumptionKind::Completed
            }
            Outcome::Failed(err) => {
                self.stats.tasks_failed += 1;
                debug!(task = %id, resumptions = task.resumptions(), "task failed");
                self.failed.record(id, err);
                self.resolution_order.push(id);
                ResumptionKind::Failed
            }
        };

        Some(Resumption { id, kind })
    }

    /// Drain the ready queue.
    ///
    /// Returns once no task is ready. Task failures are recorded in the
    /// failed ledger and never propagated.
    pub fn run_to_completion(&mut self) {
        let _span = debug_span!("run_to_completion", ready = self.ready_len()).entered();
        let draining = DrainGuard::enter(&self.shared);

        while self.step().is_some() {}

        drop(draining);
        debug!(
            completed = self.completed.len(),
            failed = self.failed.len(),
            "ready queue drained"
        );
    }

    /// Completion value recorded for `id`.
    pub fn result_of(
        &self,
        id: TaskId,
    ) -> SchedulerResult<&T> {
        self.completed.get(id).ok_or_else(|| self.not_found(id))
    }

    /// Failure value recorded for `id`.
    pub fn error_of(
        &self,
        id: TaskId,
    ) -> SchedulerResult<&E> {
        self.failed.get(id).ok_or_else(|| self.not_found(id))
    }

    fn not_found(
        &self,
        id: TaskId,
    ) -> SchedulerError {
        SchedulerError::NotFound {
            id,
            state: self.state_of(id),
        }
    }

    /// Where the task with `id` currently lives; `None` if never issued.
    pub fn state_of(
        &self,
        id: TaskId,
    ) -> Option<TaskState> {
        if !self.shared.ids.has_issued(id) {
            return None;
        }
        if self.completed.contains(id) {
            Some(TaskState::Completed)
        } else if self.failed.contains(id) {
            Some(TaskState::Failed)
        } else if self.abandoned.contains(&id) {
            Some(TaskState::Abandoned)
        } else {
            Some(TaskState::Ready)
        }
    }

    /// Whether the scheduler is inside [`run_to_completion`](Self::run_to_completion).
    #[inline]
    pub fn is_draining(&self) -> bool {
        self.shared.draining.get()
    }

    /// Number of tasks waiting to run.
    #[inline]
    pub fn ready_len(&self) -> usize {
        self.shared.ready.len()
    }

    /// Ids of the ready tasks, next to run first.
    #[inline]
    pub fn ready_ids(&self) -> Vec<TaskId> {
        self.shared.ready.ids()
    }

    /// Completed ledger.
    #[inline]
    pub fn completed(&self) -> &Ledger<T> {
        &self.completed
    }

    /// Failed ledger.
    #[inline]
    pub fn failed(&self) -> &Ledger<E> {
        &self.failed
    }

    /// Ids of tasks whose coroutine panicked, in the order they did.
    #[inline]
    pub fn abandoned(&self) -> &[TaskId] {
        &self.abandoned
    }

    /// Ids in the order they were completed or failed.
    #[inline]
    pub fn resolution_order(&self) -> &[TaskId] {
        &self.resolution_order
    }

    /// Get statistics.
    #[inline]
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            tasks_added: self.shared.ids.issued(),
            ..self.stats
        }
    }

    /// Get the configuration.
    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Consume the scheduler, keeping only its ledgers.
    ///
    /// Tasks still ready are dropped.
    pub fn into_ledgers(self) -> (Ledger<T>, Ledger<E>) {
        (self.completed, self.failed)
    }
}

impl<T, E> Default for Scheduler<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sets the draining flag for the lifetime of a drain, unwinding included.
struct DrainGuard<T, E> {
    shared: Rc<Shared<T, E>>,
}

impl<T, E> DrainGuard<T, E> {
    fn enter(shared: &Rc<Shared<T, E>>) -> Self {
        shared.draining.set(true);
        Self {
            shared: Rc::clone(shared),
        }
    }
}

impl<T, E> Drop for DrainGuard<T, E> {
    fn drop(&mut self) {
        self.shared.draining.set(false);
    }
}

/// Records the resumed task as abandoned unless disarmed after `resume`
/// returns.
struct AbandonOnUnwind<'a> {
    abandoned: &'a mut Vec<TaskId>,
    id: TaskId,
}

impl AbandonOnUnwind<'_> {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl Drop for AbandonOnUnwind<'_> {
    fn drop(&mut self) {
        error!(task = %self.id, "task panicked during resumption");
        self.abandoned.push(self.id);
    }
}

/// Handle for adding tasks to a scheduler, including from inside a
/// running coroutine.
///
/// Holds the scheduler weakly, so a spawner captured by a task does not keep
/// the scheduler's queue alive.
pub struct Spawner<T, E = TaskError> {
    shared: Weak<Shared<T, E>>,
}

impl<T, E> Clone for Spawner<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Spawner<T, E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Spawner")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl<T, E> Spawner<T, E> {
    /// Register a coroutine with the scheduler behind this handle.
    pub fn add<C>(
        &self,
        coroutine: C,
    ) -> SchedulerResult<TaskId>
    where
        C: Coroutine<Output = T, Error = E> + 'static,
    {
        let Some(shared) = self.shared.upgrade() else {
            error!("spawn attempted after scheduler was dropped");
            return Err(SchedulerError::Detached);
        };
        let id = shared.enqueue(coroutine);
        debug!(task = %id, "task spawned");
        Ok(id)
    }

    /// Whether the scheduler is still alive.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.shared.strong_count() > 0
    }

    /// Whether the scheduler is currently draining its queue.
    pub fn is_draining(&self) -> bool {
        self.shared
            .upgrade()
            .map(|shared| shared.draining.get())
            .unwrap_or(false)
    }
}
