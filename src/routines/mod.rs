//! Ready-made routines
//!
//! Iterators and coroutines for driving the scheduler: the Lucas sequence,
//! one-element-per-resumption search, stepwise primality testing, delegated
//! match collection, and cooperative sleeping.

pub mod math;
pub mod search;
pub mod time;

pub use math::{digit_count, is_prime, lucas, IsPrime, Lucas, LUCAS_MAX_DIGITS};
pub use search::{collect_matches, search, CollectMatches, Search};
pub use time::{repeat_message, sleep, RepeatMessage, Sleep};
