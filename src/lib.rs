//! coopsched
//!
//! A single-threaded cooperative coroutine scheduler. Registered coroutines
//! are resumed round-robin until each completes or fails; outcomes land in
//! per-scheduler ledgers keyed by task id, and one task's failure never
//! disturbs another.
//!
//! # Example
//!
//! ```
//! use coopsched::routines::{digit_count, lucas, search};
//! use coopsched::runtime::scheduler::Scheduler;
//!
//! let mut scheduler = Scheduler::<u128>::new();
//! let seven = scheduler.add(search(lucas(), |n: &u128| digit_count(*n) >= 7));
//! let nine = scheduler.add(search(lucas(), |n: &u128| digit_count(*n) >= 9));
//! scheduler.run_to_completion();
//!
//! assert_eq!(scheduler.result_of(seven), Ok(&1_149_851));
//! assert_eq!(scheduler.result_of(nine), Ok(&141_422_324));
//! assert_eq!(scheduler.resolution_order(), &[seven, nine]);
//! ```

#![warn(rust_2018_idioms)]

pub mod report;
pub mod routines;
pub mod runtime;
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use report::{RunReport, Value};
pub use runtime::coroutine::{Coroutine, CoroutineExt, Outcome, TaskError};
pub use runtime::scheduler::{Scheduler, SchedulerConfig, SchedulerError, Spawner, TaskId};

use std::time::Duration;

use tracing::debug;

use crate::routines::{
    collect_matches, digit_count, is_prime, lucas, repeat_message, search, LUCAS_MAX_DIGITS,
};
use crate::runtime::coroutine::generator::{self, Step};
use crate::runtime::coroutine::routine;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "coopsched";

/// One Lucas search task per digit-length threshold.
///
/// Each task completes with the first Lucas number having at least that
/// many decimal digits. Thresholds above [`LUCAS_MAX_DIGITS`] are rejected
/// before anything runs, since no search for them could succeed.
pub fn run_search(
    config: &SchedulerConfig,
    thresholds: &[u32],
) -> Result<RunReport> {
    if let Some(&digits) = thresholds.iter().find(|&&digits| digits > LUCAS_MAX_DIGITS) {
        anyhow::bail!(
            "cannot search for {} digits: the longest representable Lucas number has {}",
            digits,
            LUCAS_MAX_DIGITS
        );
    }

    let mut scheduler = Scheduler::<Value>::with_config(config.clone());
    let labels: Vec<(TaskId, String)> = thresholds
        .iter()
        .map(|&digits| {
            let id = scheduler.add(lucas_search(digits));
            (id, format!("search(digits >= {})", digits))
        })
        .collect();

    debug!(tasks = labels.len(), "running search workload");
    scheduler.run_to_completion();
    Ok(RunReport::collect(&scheduler, &labels))
}

/// Collect the primes among the first `count` Lucas numbers, delegating each
/// primality check to a stepwise coroutine.
pub fn run_primes(
    config: &SchedulerConfig,
    count: usize,
) -> RunReport {
    let mut scheduler = Scheduler::<Value>::with_config(config.clone());
    let id = scheduler.add(lucas_primes(count));

    debug!(count, "running primes workload");
    scheduler.run_to_completion();
    RunReport::collect(&scheduler, &[(id, format!("primes(first {})", count))])
}

/// A mixed run exercising every outcome the scheduler records.
///
/// Searches and a primes collection complete; a repeated message sleeps
/// cooperatively between emissions; a bounded search fails by exhaustion; a
/// malformed routine is flagged for yielding a payload; a launcher spawns
/// another search while the scheduler is draining.
pub fn run_demo(config: &SchedulerConfig) -> RunReport {
    let mut scheduler = Scheduler::<Value>::with_config(config.clone());
    let mut labels = Vec::new();

    for digits in [7, 9] {
        let id = scheduler.add(lucas_search(digits));
        labels.push((id, format!("search(digits >= {})", digits)));
    }

    let id = scheduler.add(lucas_primes(12));
    labels.push((id, "primes(first 12)".to_string()));

    let id = scheduler.add(
        repeat_message(
            "Unattended baggage will be destroyed",
            Duration::from_millis(5),
            2,
        )
        .map(|emitted| Value::Number(emitted as u128)),
    );
    labels.push((id, "repeat_message".to_string()));

    let id = scheduler.add(
        search(lucas().take(10), |n: &u128| digit_count(*n) >= 7).map(Value::Number),
    );
    labels.push((id, "search(first 10, >= 7)".to_string()));

    let mut yielded = 0u64;
    let id = scheduler.add(routine(generator::from_fn(move || {
        yielded += 1;
        Step::<_, Value, TaskError>::Yielded(Some(yielded))
    })));
    labels.push((id, "malformed".to_string()));

    let spawner = scheduler.spawner();
    let mut spawned = None;
    let id = scheduler.add(runtime::coroutine::from_fn(move || match spawned {
        Some(child) => Outcome::Completed(Value::Number(child as u128)),
        None => match spawner.add(lucas_search(11)) {
            Ok(child) => {
                spawned = Some(child.inner());
                Outcome::Suspended
            }
            Err(err) => Outcome::Failed(TaskError::raised(err.to_string())),
        },
    }));
    labels.push((id, "launcher".to_string()));

    debug!(tasks = labels.len(), "running demo workload");
    scheduler.run_to_completion();
    RunReport::collect(&scheduler, &labels)
}

fn lucas_search(digits: u32) -> impl Coroutine<Output = Value, Error = TaskError> {
    search(lucas(), move |n: &u128| digit_count(*n) >= digits).map(Value::Number)
}

fn lucas_primes(count: usize) -> impl Coroutine<Output = Value, Error = TaskError> {
    collect_matches(lucas().take(count), |n: &u128| is_prime(*n)).map(Value::List)
}
