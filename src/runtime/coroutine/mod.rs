//! Suspendable computations
//!
//! A [`Coroutine`] is resumed one step at a time. Each resumption ends in
//! exactly one [`Outcome`]: it suspends with no payload, completes with a
//! final value, or fails with an error. After completing or failing it must
//! not be resumed again.
//!
//! Coroutines can be written by hand as state machines, built from closures
//! with [`from_fn`], adapted from payload-yielding generators with
//! [`routine`](generator::routine), or composed with [`CoroutineExt`].

pub mod combinator;
pub mod errors;
pub mod generator;

pub use combinator::{AndThen, CoroutineExt, Map, MapErr};
pub use errors::{ProtocolViolation, TaskError};
pub use generator::{routine, Generator, Payload, Routine, Step};

use std::fmt;


/// Result of one resumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    /// Yielded control; resume again later.
    Suspended,
    /// Finished with a final value.
    Completed(T),
    /// Failed with an unrecoverable error.
    Failed(E),
}

impl<T, E> Outcome<T, E> {
    /// Whether this outcome ends the coroutine.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Suspended)
    }

    /// Transform the completion value.
    pub fn map<U>(
        self,
        f: impl FnOnce(T) -> U,
    ) -> Outcome<U, E> {
        match self {
            Outcome::Suspended => Outcome::Suspended,
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Failed(error) => Outcome::Failed(error),
        }
    }

    /// Transform the failure value.
    pub fn map_err<F>(
        self,
        f: impl FnOnce(E) -> F,
    ) -> Outcome<T, F> {
        match self {
            Outcome::Suspended => Outcome::Suspended,
            Outcome::Completed(value) => Outcome::Completed(value),
            Outcome::Failed(error) => Outcome::Failed(f(error)),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Completed(value),
            Err(error) => Outcome::Failed(error),
        }
    }
}

/// A resumable computation.
pub trait Coroutine {
    /// Final value on completion.
    type Output;
    /// Failure value.
    type Error;

    /// Run until the next suspension point or termination.
    fn resume(&mut self) -> Outcome<Self::Output, Self::Error>;
}

/// Type-erased coroutine, as stored by the scheduler.
pub type BoxCoroutine<T, E> = Box<dyn Coroutine<Output = T, Error = E>>;

impl<C: Coroutine + ?Sized> Coroutine for Box<C> {
    type Output = C::Output;
    type Error = C::Error;

    #[inline]
    fn resume(&mut self) -> Outcome<Self::Output, Self::Error> {
        (**self).resume()
    }
}

impl<C: Coroutine + ?Sized> Coroutine for &mut C {
    type Output = C::Output;
    type Error = C::Error;

    #[inline]
    fn resume(&mut self) -> Outcome<Self::Output, Self::Error> {
        (**self).resume()
    }
}

/// Coroutine backed by a closure; see [`from_fn`].
pub struct FnCoroutine<F> {
    f: F,
}

impl<F> fmt::Debug for FnCoroutine<F> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("FnCoroutine").finish_non_exhaustive()
    }
}

impl<F, T, E> Coroutine for FnCoroutine<F>
where
    F: FnMut() -> Outcome<T, E>,
{
    type Output = T;
    type Error = E;

    #[inline]
    fn resume(&mut self) -> Outcome<T, E> {
        (self.f)()
    }
}

/// Build a coroutine whose every resumption calls `f`.
///
/// State lives in whatever `f` captures.
///
/// ```
/// use coopsched::runtime::coroutine::{from_fn, Coroutine, Outcome};
///
/// let mut left = 2;
/// let mut countdown = from_fn(move || {
///     if left == 0 {
///         return Outcome::<_, ()>::Completed("done");
///     }
///     left -= 1;
///     Outcome::Suspended
/// });
/// assert_eq!(countdown.resume(), Outcome::Suspended);
/// assert_eq!(countdown.resume(), Outcome::Suspended);
/// assert_eq!(countdown.resume(), Outcome::Completed("done"));
/// ```
#[inline]
pub fn from_fn<F, T, E>(f: F) -> FnCoroutine<F>
where
    F: FnMut() -> Outcome<T, E>,
{
    FnCoroutine { f }
}

/// Coroutine that suspends `times` times, then completes with `value`.
///
/// Resuming it again afterwards fails with
/// [`ProtocolViolation::ResumedAfterTermination`].
pub fn suspend_then<T, E>(
    times: usize,
    value: T,
) -> Routine<impl Generator<Yield = (), Return = T, Error = E>>
where
    E: From<ProtocolViolation>,
{
    let mut left = times;
    let mut value = Some(value);
    routine(generator::from_fn(move || {
        if left > 0 {
            left -= 1;
            return Step::Yielded(());
        }
        // `Routine` stops stepping once this has returned.
        match value.take() {
            Some(value) => Step::Returned(value),
            None => Step::Yielded(()),
        }
    }))
}
