//! Scheduler 单元测试
//!
//! 测试任务标识、账本查询和调度循环

use crate::runtime::coroutine::{from_fn, suspend_then, Coroutine, Outcome, TaskError};
use crate::runtime::scheduler::{
    Ledger, ResumptionKind, Scheduler, SchedulerConfig, SchedulerError, TaskId, TaskIdGenerator,
    TaskState,
};


/// Suspends `suspensions` times, then fails with `message`.
pub(super) fn fail_after<T>(
    suspensions: usize,
    message: &'static str,
) -> impl Coroutine<Output = T, Error = TaskError> {
    let mut left = suspensions;
    from_fn(move || {
        if left == 0 {
            return Outcome::Failed(TaskError::raised(message));
        }
        left -= 1;
        Outcome::Suspended
    })
}

#[cfg(test)]
mod task_id_tests {
    use super::*;

    #[test]
    fn test_task_id_inner() {
        let id = TaskId(7);
        assert_eq!(id.inner(), 7);
        assert_eq!(usize::from(id), 7);
        assert_eq!(TaskId::from(7), id);
    }

    #[test]
    fn test_task_id_display() {
        assert_eq!(TaskId(42).to_string(), "Task(42)");
    }

    #[test]
    fn test_task_id_ordering() {
        assert!(TaskId(1) < TaskId(2));
        assert_ne!(TaskId(1), TaskId(2));
    }

    #[test]
    fn test_generator_is_strictly_increasing() {
        let ids = TaskIdGenerator::new();
        assert_eq!(ids.next(), TaskId(0));
        assert_eq!(ids.next(), TaskId(1));
        assert_eq!(ids.next(), TaskId(2));
        assert!(ids.has_issued(TaskId(2)));
        assert!(!ids.has_issued(TaskId(3)));
        assert_eq!(ids.issued(), 3);
    }
}

#[cfg(test)]
mod ledger_tests {
    use super::*;

    #[test]
    fn test_ledger_keeps_record_order() {
        let mut ledger = Ledger::new();
        ledger.record(TaskId(3), "c");
        ledger.record(TaskId(1), "a");
        assert_eq!(ledger.ids().collect::<Vec<_>>(), vec![TaskId(3), TaskId(1)]);
        assert_eq!(ledger.get(TaskId(1)), Some(&"a"));
        assert!(!ledger.contains(TaskId(2)));
    }

    #[test]
    fn test_ledger_take() {
        let mut ledger = Ledger::new();
        ledger.record(TaskId(0), 10);
        assert_eq!(ledger.take(TaskId(0)), Some(10));
        assert!(ledger.is_empty());
    }
}

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    #[test]
    fn test_scheduler_new_is_idle_and_empty() {
        let scheduler: Scheduler<u32> = Scheduler::new();
        assert!(!scheduler.is_draining());
        assert_eq!(scheduler.ready_len(), 0);
        assert!(scheduler.completed().is_empty());
        assert!(scheduler.failed().is_empty());
        let _ = format!("{:?}", scheduler);
    }

    #[test]
    fn test_scheduler_with_config() {
        let config = SchedulerConfig {
            initial_capacity: 2,
            log_resumptions: false,
        };
        let scheduler: Scheduler<u32> = Scheduler::with_config(config.clone());
        assert_eq!(scheduler.config(), &config);
    }

    #[test]
    fn test_add_issues_ids_from_zero() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        let a = scheduler.add(suspend_then(0, 1));
        let b = scheduler.add(suspend_then(0, 2));
        let c = scheduler.add(suspend_then(0, 3));
        assert_eq!((a, b, c), (TaskId(0), TaskId(1), TaskId(2)));
        assert_eq!(scheduler.ready_ids(), vec![a, b, c]);
    }

    #[test]
    fn test_ids_are_scoped_per_scheduler() {
        let mut first: Scheduler<u32> = Scheduler::new();
        first.add(suspend_then(0, 1));
        first.add(suspend_then(0, 2));

        let mut second: Scheduler<u32> = Scheduler::new();
        assert_eq!(second.add(suspend_then(0, 3)), TaskId(0));
    }

    #[test]
    fn test_ids_not_reused_after_resolution() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        let a = scheduler.add(suspend_then(0, 1));
        scheduler.run_to_completion();
        let b = scheduler.add(suspend_then(0, 2));
        assert!(b > a);
        scheduler.run_to_completion();
        assert_eq!(scheduler.result_of(a), Ok(&1));
        assert_eq!(scheduler.result_of(b), Ok(&2));
    }

    #[test]
    fn test_lookup_unknown_id() {
        let scheduler: Scheduler<u32> = Scheduler::new();
        assert_eq!(
            scheduler.result_of(TaskId(9)),
            Err(SchedulerError::NotFound {
                id: TaskId(9),
                state: None,
            })
        );
        assert_eq!(scheduler.state_of(TaskId(9)), None);
    }

    #[test]
    fn test_lookup_before_run() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        let id = scheduler.add(suspend_then(1, 5));
        assert_eq!(scheduler.state_of(id), Some(TaskState::Ready));
        assert_eq!(
            scheduler.result_of(id),
            Err(SchedulerError::NotFound {
                id,
                state: Some(TaskState::Ready),
            })
        );
    }

    #[test]
    fn test_lookup_in_the_other_ledger() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        let ok = scheduler.add(suspend_then(0, 5));
        let bad = scheduler.add(fail_after(0, "boom"));
        scheduler.run_to_completion();

        assert_eq!(scheduler.result_of(ok), Ok(&5));
        assert_eq!(scheduler.error_of(bad), Ok(&TaskError::raised("boom")));
        assert_eq!(
            scheduler.error_of(ok),
            Err(SchedulerError::NotFound {
                id: ok,
                state: Some(TaskState::Completed),
            })
        );
        assert!(matches!(
            scheduler.result_of(bad),
            Err(SchedulerError::NotFound {
                state: Some(TaskState::Failed),
                ..
            })
        ));
    }

    #[test]
    fn test_not_found_message() {
        let err = SchedulerError::NotFound {
            id: TaskId(4),
            state: Some(TaskState::Ready),
        };
        assert_eq!(err.to_string(), "Task(4) not found (still ready)");
    }

    #[test]
    fn test_step_reports_each_resumption() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        let id = scheduler.add(suspend_then(1, 3));

        let first = scheduler.step().unwrap();
        assert_eq!((first.id, first.kind), (id, ResumptionKind::Suspended));
        let second = scheduler.step().unwrap();
        assert_eq!((second.id, second.kind), (id, ResumptionKind::Completed));
        assert!(scheduler.step().is_none());
    }

    #[test]
    fn test_into_ledgers() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        let ok = scheduler.add(suspend_then(2, 1));
        let bad = scheduler.add(fail_after(1, "late"));
        scheduler.run_to_completion();

        let (completed, failed) = scheduler.into_ledgers();
        assert_eq!(completed.get(ok), Some(&1));
        assert!(failed.contains(bad));
    }
}
