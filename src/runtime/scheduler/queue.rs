//! Ready queue for the scheduler
//!
//! Single-threaded FIFO of tasks awaiting their next resumption. Interior
//! mutability lets a running coroutine enqueue work through a
//! [`Spawner`](super::Spawner) while the scheduler is draining; no borrow is
//! held across a resumption.

use std::cell::RefCell;
use std::collections::VecDeque;

use super::task::{Task, TaskId};

/// FIFO queue of ready tasks.
#[derive(Debug)]
pub struct TaskQueue<T, E> {
    inner: RefCell<VecDeque<Task<T, E>>>,
}

impl<T, E> TaskQueue<T, E> {
    /// Create a new empty task queue.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty queue with room for `capacity` tasks.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RefCell::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Push a task to the back of the queue.
    #[inline]
    pub fn push(
        &self,
        task: Task<T, E>,
    ) {
        self.inner.borrow_mut().push_back(task);
    }

    /// Pop the task that has waited longest.
    #[inline]
    pub fn pop_front(&self) -> Option<Task<T, E>> {
        self.inner.borrow_mut().pop_front()
    }

    /// Get the number of tasks in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Check if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Ids of the queued tasks, front first.
    pub fn ids(&self) -> Vec<TaskId> {
        self.inner.borrow().iter().map(Task::id).collect()
    }
}

impl<T, E> Default for TaskQueue<T, E> {
    fn default() -> Self {
        Self::new()
    }
}
