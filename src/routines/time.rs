//! Cooperative waiting.
//!
//! These routines read the wall clock themselves; the scheduler never does.
//! Waiting is done by suspending until a deadline has passed, so a sleeping
//! task keeps getting resumed while other tasks run.

use std::time::{Duration, Instant};

use tracing::info;

use crate::runtime::coroutine::{Coroutine, Outcome, TaskError};

/// See [`sleep`].
#[derive(Debug, Clone)]
pub struct Sleep {
    duration: Duration,
    deadline: Option<Instant>,
}

/// A coroutine that suspends until `duration` has elapsed.
///
/// The clock starts at the first resumption, which always suspends; each
/// later one completes if the deadline has passed and suspends otherwise.
#[inline]
pub fn sleep(duration: Duration) -> Sleep {
    Sleep {
        duration,
        deadline: None,
    }
}

impl Coroutine for Sleep {
    type Output = ();
    type Error = TaskError;

    fn resume(&mut self) -> Outcome<(), TaskError> {
        let Some(deadline) = self.deadline else {
            self.deadline = Some(Instant::now() + self.duration);
            return Outcome::Suspended;
        };
        if Instant::now() >= deadline {
            Outcome::Completed(())
        } else {
            Outcome::Suspended
        }
    }
}

/// See [`repeat_message`].
#[derive(Debug, Clone)]
pub struct RepeatMessage {
    message: String,
    interval: Duration,
    remaining: usize,
    emitted: usize,
    waiting: Option<Sleep>,
}

/// A coroutine that logs `message` `times` times, sleeping cooperatively
/// for `interval` after each one.
///
/// Completes with the number of messages emitted.
pub fn repeat_message(
    message: impl Into<String>,
    interval: Duration,
    times: usize,
) -> RepeatMessage {
    RepeatMessage {
        message: message.into(),
        interval,
        remaining: times,
        emitted: 0,
        waiting: None,
    }
}

impl Coroutine for RepeatMessage {
    type Output = usize;
    type Error = TaskError;

    fn resume(&mut self) -> Outcome<usize, TaskError> {
        loop {
            if let Some(waiting) = &mut self.waiting {
                match waiting.resume() {
                    Outcome::Completed(()) => self.waiting = None,
                    other => return other.map(|()| self.emitted),
                }
            }

            if self.remaining == 0 {
                return Outcome::Completed(self.emitted);
            }

            info!("{}", self.message);
            self.remaining -= 1;
            self.emitted += 1;
            self.waiting = Some(sleep(self.interval));
        }
    }
}
