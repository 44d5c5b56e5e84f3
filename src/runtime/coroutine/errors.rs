//! Coroutine errors

use thiserror::Error;

/// A coroutine broke the suspension contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    /// A suspension carried a payload. Suspensions must be empty.
    #[error("suspension carried a payload: {payload}")]
    NonEmptySuspension { payload: String },

    /// The coroutine was resumed after it completed or failed.
    #[error("resumed after termination")]
    ResumedAfterTermination,
}

/// Default failure type for tasks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// A search ran out of input without a match.
    #[error("Not found")]
    NotFound,

    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("{0}")]
    Raised(String),
}

impl TaskError {
    /// Build a [`TaskError::Raised`] from any message.
    #[inline]
    pub fn raised(message: impl Into<String>) -> Self {
        TaskError::Raised(message.into())
    }

    /// Whether this failure is a contract breach rather than an ordinary error.
    #[inline]
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, TaskError::Protocol(_))
    }
}
