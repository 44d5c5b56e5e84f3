//! Failure isolation through the public scheduler API

use coopsched::routines::{digit_count, is_prime, lucas, search};
use coopsched::runtime::coroutine::from_fn;
use coopsched::runtime::scheduler::TaskState;
use coopsched::{CoroutineExt, Outcome, Scheduler, SchedulerError, TaskError};

#[test]
fn test_failures_do_not_disturb_neighbours() {
    let mut scheduler: Scheduler<u128> = Scheduler::new();
    let mut calls = 0;
    let flaky = scheduler.add(from_fn(move || {
        calls += 1;
        if calls < 4 {
            Outcome::Suspended
        } else {
            Outcome::Failed(TaskError::raised("gave up"))
        }
    }));
    let steady = scheduler.add(search(lucas(), |n: &u128| digit_count(*n) >= 7));
    let exhausted = scheduler.add(search(lucas().take(3), |n: &u128| *n > 100));

    scheduler.run_to_completion();

    assert_eq!(scheduler.result_of(steady), Ok(&1_149_851));
    assert_eq!(scheduler.error_of(flaky), Ok(&TaskError::raised("gave up")));
    assert_eq!(scheduler.error_of(exhausted), Ok(&TaskError::NotFound));
    assert_eq!(scheduler.resolution_order(), &[flaky, exhausted, steady]);
}

#[test]
fn test_lookups_distinguish_states() {
    let mut scheduler: Scheduler<bool> = Scheduler::new();
    let prime = scheduler.add(is_prime(97));
    let failing = scheduler.add(is_prime(10).and_then(|_| {
        from_fn(|| Outcome::<bool, _>::Failed(TaskError::raised("after check")))
    }));

    assert_eq!(scheduler.state_of(prime), Some(TaskState::Ready));
    assert_eq!(
        scheduler.result_of(prime),
        Err(SchedulerError::NotFound {
            id: prime,
            state: Some(TaskState::Ready),
        })
    );

    scheduler.run_to_completion();

    assert_eq!(scheduler.result_of(prime), Ok(&true));
    assert!(scheduler.error_of(prime).is_err());
    assert!(scheduler.result_of(failing).is_err());
    assert_eq!(scheduler.error_of(failing), Ok(&TaskError::raised("after check")));
}

#[test]
fn test_custom_error_type() {
    #[derive(Debug, PartialEq)]
    struct Refused(u8);

    let mut scheduler: Scheduler<u8, Refused> = Scheduler::new();
    let ok = scheduler.add(from_fn(|| Outcome::Completed(1)));
    let refused = scheduler.add(from_fn(|| Outcome::Failed(Refused(2))));
    scheduler.run_to_completion();

    let (completed, failed) = scheduler.into_ledgers();
    assert_eq!(completed.get(ok), Some(&1));
    assert_eq!(failed.get(refused), Some(&Refused(2)));
}
