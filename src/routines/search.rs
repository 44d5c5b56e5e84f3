//! Searching an iterable one element per resumption.

use std::fmt;

use crate::runtime::coroutine::{Coroutine, Outcome, TaskError};

/// See [`search`].
pub struct Search<I, P> {
    items: I,
    predicate: P,
}

impl<I: fmt::Debug, P> fmt::Debug for Search<I, P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Search")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

/// A coroutine returning the first item of `items` matching `predicate`.
///
/// Each resumption examines one item: a match completes the search, a miss
/// suspends it. Running out of items fails with [`TaskError::NotFound`].
///
/// ```
/// use coopsched::routines::{digit_count, lucas, search};
/// use coopsched::runtime::scheduler::Scheduler;
///
/// let mut scheduler = Scheduler::<u128>::new();
/// let id = scheduler.add(search(lucas(), |n: &u128| digit_count(*n) >= 7));
/// scheduler.run_to_completion();
/// assert_eq!(scheduler.result_of(id), Ok(&1_149_851));
/// ```
#[inline]
pub fn search<I, P>(
    items: I,
    predicate: P,
) -> Search<I::IntoIter, P>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    Search {
        items: items.into_iter(),
        predicate,
    }
}

impl<I, P> Coroutine for Search<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
    type Output = I::Item;
    type Error = TaskError;

    fn resume(&mut self) -> Outcome<I::Item, TaskError> {
        match self.items.next() {
            Some(item) if (self.predicate)(&item) => Outcome::Completed(item),
            Some(_) => Outcome::Suspended,
            None => Outcome::Failed(TaskError::NotFound),
        }
    }
}

/// See [`collect_matches`].
pub struct CollectMatches<I: Iterator, F, C> {
    items: I,
    make_predicate: F,
    pending: Option<(I::Item, C)>,
    matches: Vec<I::Item>,
}

impl<I, F, C> fmt::Debug for CollectMatches<I, F, C>
where
    I: Iterator,
    I::Item: fmt::Debug,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("CollectMatches")
            .field("pending", &self.pending.as_ref().map(|(item, _)| item))
            .field("matches", &self.matches)
            .finish_non_exhaustive()
    }
}

/// A coroutine collecting every item of `items` accepted by a predicate
/// coroutine.
///
/// For each item, `make_predicate` builds a coroutine yielding `bool`; its
/// suspensions are forwarded as suspensions of this routine. After each
/// item is decided the routine suspends once, and it completes with the
/// matches, in input order, once `items` is exhausted. A failing predicate
/// fails the whole routine.
pub fn collect_matches<I, F, C>(
    items: I,
    make_predicate: F,
) -> CollectMatches<I::IntoIter, F, C>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> C,
    C: Coroutine<Output = bool>,
{
    CollectMatches {
        items: items.into_iter(),
        make_predicate,
        pending: None,
        matches: Vec::new(),
    }
}

impl<I, F, C> Coroutine for CollectMatches<I, F, C>
where
    I: Iterator,
    F: FnMut(&I::Item) -> C,
    C: Coroutine<Output = bool>,
{
    type Output = Vec<I::Item>;
    type Error = C::Error;

    fn resume(&mut self) -> Outcome<Vec<I::Item>, C::Error> {
        let (item, mut predicate) = match self.pending.take() {
            Some(pending) => pending,
            None => match self.items.next() {
                Some(item) => {
                    let predicate = (self.make_predicate)(&item);
                    (item, predicate)
                }
                None => return Outcome::Completed(std::mem::take(&mut self.matches)),
            },
        };

        match predicate.resume() {
            Outcome::Suspended => {
                self.pending = Some((item, predicate));
            }
            Outcome::Completed(true) => self.matches.push(item),
            Outcome::Completed(false) => {}
            Outcome::Failed(err) => return Outcome::Failed(err),
        }
        Outcome::Suspended
    }
}
