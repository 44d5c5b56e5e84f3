//! Numeric routines: the Lucas sequence and stepwise primality.

use crate::runtime::coroutine::{Coroutine, Outcome, TaskError};

/// Iterator over the Lucas numbers: 2, 1, 3, 4, 7, 11, 18, ...
///
/// Ends instead of overflowing once the next term no longer fits in `u128`;
/// the last term, [`LUCAS_MAX_DIGITS`] digits long, is the 185th.
#[derive(Debug, Clone)]
pub struct Lucas {
    current: Option<u128>,
    next: Option<u128>,
}

/// The Lucas sequence from its first term.
///
/// ```
/// use coopsched::routines::lucas;
///
/// let head: Vec<u128> = lucas().take(8).collect();
/// assert_eq!(head, [2, 1, 3, 4, 7, 11, 18, 29]);
/// ```
#[inline]
pub fn lucas() -> Lucas {
    Lucas {
        current: Some(2),
        next: Some(1),
    }
}

impl Iterator for Lucas {
    type Item = u128;

    fn next(&mut self) -> Option<u128> {
        let current = self.current?;
        let following = self.next.and_then(|next| current.checked_add(next));
        self.current = self.next;
        self.next = following;
        Some(current)
    }
}

/// Digit length of the longest Lucas number [`lucas`] yields.
pub const LUCAS_MAX_DIGITS: u32 = 39;

/// Number of decimal digits in `n`.
#[inline]
pub fn digit_count(n: u128) -> u32 {
    n.checked_ilog10().map_or(1, |log| log + 1)
}

/// Stepwise trial-division primality test; see [`is_prime`].
#[derive(Debug, Clone)]
pub struct IsPrime {
    candidate: u128,
    divisor: u128,
    limit: u128,
}

/// A coroutine deciding whether `x` is prime.
///
/// Completes `false` immediately for `x < 2` or as soon as a divisor is
/// found, suspends after every divisor that does not divide `x`, and
/// completes `true` once all divisors up to `⌊√x⌋` are ruled out.
#[inline]
pub fn is_prime(x: u128) -> IsPrime {
    IsPrime {
        candidate: x,
        divisor: 2,
        limit: x.isqrt(),
    }
}

impl Coroutine for IsPrime {
    type Output = bool;
    type Error = TaskError;

    fn resume(&mut self) -> Outcome<bool, TaskError> {
        if self.candidate < 2 {
            return Outcome::Completed(false);
        }
        if self.divisor > self.limit {
            return Outcome::Completed(true);
        }
        if self.candidate % self.divisor == 0 {
            return Outcome::Completed(false);
        }
        self.divisor += 1;
        Outcome::Suspended
    }
}
