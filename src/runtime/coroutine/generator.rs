//! Payload-yielding generators and their adaptation into coroutines.
//!
//! A [`Generator`] is the lower-level primitive: each step yields a value,
//! returns, or raises. Scheduled work must suspend without a payload, so
//! [`Routine`] checks every yielded value through [`Payload`] and turns a
//! non-empty one into a [`ProtocolViolation`] failure on the first offending
//! step.
//!
//! A generator with `Yield = ()` cannot violate the contract at all; the
//! check only costs anything for payload-bearing yields such as `Option<P>`.

use std::fmt;

use tracing::error;

use super::errors::ProtocolViolation;
use super::{Coroutine, Outcome};

/// Result of one generator step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<Y, R, E> {
    Yielded(Y),
    Returned(R),
    Raised(E),
}

/// A steppable computation whose suspensions may carry a value.
pub trait Generator {
    type Yield;
    type Return;
    type Error;

    fn step(&mut self) -> Step<Self::Yield, Self::Return, Self::Error>;
}

/// Decides whether a yielded value counts as an empty suspension.
pub trait Payload {
    fn is_empty(&self) -> bool;

    /// Human-readable form used when reporting a violation.
    fn describe(&self) -> String;
}

impl Payload for () {
    #[inline]
    fn is_empty(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        "()".to_string()
    }
}

impl<P: fmt::Debug> Payload for Option<P> {
    #[inline]
    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// Generator backed by a closure; see [`from_fn`].
pub struct FnGenerator<F> {
    f: F,
}

impl<F> fmt::Debug for FnGenerator<F> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("FnGenerator").finish_non_exhaustive()
    }
}

impl<F, Y, R, E> Generator for FnGenerator<F>
where
    F: FnMut() -> Step<Y, R, E>,
{
    type Yield = Y;
    type Return = R;
    type Error = E;

    #[inline]
    fn step(&mut self) -> Step<Y, R, E> {
        (self.f)()
    }
}

/// Build a generator whose every step calls `f`.
#[inline]
pub fn from_fn<F, Y, R, E>(f: F) -> FnGenerator<F>
where
    F: FnMut() -> Step<Y, R, E>,
{
    FnGenerator { f }
}

/// A generator adapted to the coroutine contract.
#[derive(Debug)]
pub struct Routine<G> {
    generator: G,
    terminated: bool,
}

impl<G> Routine<G> {
    /// Whether the routine has completed or failed.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// Adapt `generator` into a [`Coroutine`].
#[inline]
pub fn routine<G: Generator>(generator: G) -> Routine<G> {
    Routine {
        generator,
        terminated: false,
    }
}

impl<G> Coroutine for Routine<G>
where
    G: Generator,
    G::Yield: Payload,
    G::Error: From<ProtocolViolation>,
{
    type Output = G::Return;
    type Error = G::Error;

    fn resume(&mut self) -> Outcome<G::Return, G::Error> {
        if self.terminated {
            return Outcome::Failed(ProtocolViolation::ResumedAfterTermination.into());
        }

        match self.generator.step() {
            Step::Yielded(payload) if payload.is_empty() => Outcome::Suspended,
            Step::Yielded(payload) => {
                self.terminated = true;
                let violation = ProtocolViolation::NonEmptySuspension {
                    payload: payload.describe(),
                };
                error!("{}", violation);
                Outcome::Failed(violation.into())
            }
            Step::Returned(value) => {
                self.terminated = true;
                Outcome::Completed(value)
            }
            Step::Raised(err) => {
                self.terminated = true;
                Outcome::Failed(err)
            }
        }
    }
}
