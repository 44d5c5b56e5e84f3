//! Coroutine combinators.
//!
//! [`CoroutineExt::and_then`] is the delegation form: the outer coroutine
//! forwards every suspension of the inner one and picks up its completion
//! value within the same resumption.

use super::{BoxCoroutine, Coroutine, Outcome};

/// Extension methods available on every [`Coroutine`].
pub trait CoroutineExt: Coroutine + Sized {
    /// Transform the completion value.
    fn map<U, F>(
        self,
        f: F,
    ) -> Map<Self, F>
    where
        F: FnMut(Self::Output) -> U,
    {
        Map { inner: self, f }
    }

    /// Transform the failure value.
    fn map_err<G, F>(
        self,
        f: F,
    ) -> MapErr<Self, F>
    where
        F: FnMut(Self::Error) -> G,
    {
        MapErr { inner: self, f }
    }

    /// Continue with the coroutine built from this one's completion value.
    fn and_then<B, F>(
        self,
        f: F,
    ) -> AndThen<Self, B, F>
    where
        B: Coroutine<Error = Self::Error>,
        F: FnOnce(Self::Output) -> B,
    {
        AndThen {
            stage: Stage::First(self, Some(f)),
        }
    }

    /// Erase the concrete type.
    fn boxed(self) -> BoxCoroutine<Self::Output, Self::Error>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<C: Coroutine> CoroutineExt for C {}

/// See [`CoroutineExt::map`].
#[derive(Debug)]
pub struct Map<C, F> {
    inner: C,
    f: F,
}

impl<C, F, U> Coroutine for Map<C, F>
where
    C: Coroutine,
    F: FnMut(C::Output) -> U,
{
    type Output = U;
    type Error = C::Error;

    fn resume(&mut self) -> Outcome<U, C::Error> {
        self.inner.resume().map(&mut self.f)
    }
}

/// See [`CoroutineExt::map_err`].
#[derive(Debug)]
pub struct MapErr<C, F> {
    inner: C,
    f: F,
}

impl<C, F, G> Coroutine for MapErr<C, F>
where
    C: Coroutine,
    F: FnMut(C::Error) -> G,
{
    type Output = C::Output;
    type Error = G;

    fn resume(&mut self) -> Outcome<C::Output, G> {
        self.inner.resume().map_err(&mut self.f)
    }
}

#[derive(Debug)]
enum Stage<A, B, F> {
    First(A, Option<F>),
    Second(B),
}

/// See [`CoroutineExt::and_then`].
#[derive(Debug)]
pub struct AndThen<A, B, F> {
    stage: Stage<A, B, F>,
}

impl<A, B, F> Coroutine for AndThen<A, B, F>
where
    A: Coroutine,
    B: Coroutine<Error = A::Error>,
    F: FnOnce(A::Output) -> B,
{
    type Output = B::Output;
    type Error = A::Error;

    fn resume(&mut self) -> Outcome<B::Output, A::Error> {
        if let Stage::First(first, next) = &mut self.stage {
            let value = match first.resume() {
                Outcome::Suspended => return Outcome::Suspended,
                Outcome::Failed(err) => return Outcome::Failed(err),
                Outcome::Completed(value) => value,
            };
            // `next` is only taken here, right before the stage changes.
            let Some(next) = next.take() else {
                return Outcome::Suspended;
            };
            self.stage = Stage::Second(next(value));
        }

        match &mut self.stage {
            Stage::Second(second) => second.resume(),
            Stage::First(..) => Outcome::Suspended,
        }
    }
}
