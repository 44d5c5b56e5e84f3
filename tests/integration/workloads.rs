//! Bundled workload integration tests
//!
//! Runs the search, primes and demo workloads end to end through the
//! public entry points.

use coopsched::routines::LUCAS_MAX_DIGITS;
use coopsched::runtime::scheduler::TaskState;
use coopsched::{run_demo, run_primes, run_search, SchedulerConfig, TaskId, Value};

#[test]
fn test_search_workload() {
    let report = run_search(&SchedulerConfig::default(), &[7, 9]).unwrap();

    assert_eq!(report.tasks.len(), 2);
    assert_eq!(report.tasks[0].value, Some(Value::Number(1_149_851)));
    assert_eq!(report.tasks[1].value, Some(Value::Number(141_422_324)));
    assert_eq!(report.resolution_order, vec![TaskId(0), TaskId(1)]);
    assert_eq!(report.stats.resumptions, 30 + 40);
    assert_eq!(report.stats.suspensions, 29 + 39);
}

#[test]
fn test_search_thresholds_resolve_shortest_first() {
    let report = run_search(&SchedulerConfig::default(), &[11, 7, 9]).unwrap();

    assert_eq!(report.tasks[0].value, Some(Value::Number(10_749_957_122)));
    assert_eq!(report.resolution_order, vec![TaskId(1), TaskId(2), TaskId(0)]);
}

#[test]
fn test_search_past_u64() {
    let report = run_search(&SchedulerConfig::default(), &[20, 21]).unwrap();

    assert_eq!(report.tasks[0].value, Some(Value::Number(10_420_180_999_117_162_549)));
    assert_eq!(report.tasks[1].value, Some(Value::Number(115_561_578_124_838_522_882)));
    assert_eq!(report.stats.tasks_failed, 0);
    assert_eq!(report.stats.resumptions, 92 + 97);
}

#[test]
fn test_search_longest_representable() {
    let report = run_search(&SchedulerConfig::default(), &[LUCAS_MAX_DIGITS]).unwrap();

    assert_eq!(report.tasks[0].state, TaskState::Completed);
    assert_eq!(
        report.tasks[0].value,
        Some(Value::Number(108_580_172_054_362_347_934_782_139_964_888_177_403))
    );
}

#[test]
fn test_search_rejects_unrepresentable_threshold() {
    let err = run_search(&SchedulerConfig::default(), &[7, LUCAS_MAX_DIGITS + 1]).unwrap_err();
    assert!(err.to_string().contains("40 digits"));
}

#[test]
fn test_empty_search_workload() {
    let report = run_search(&SchedulerConfig::default(), &[]).unwrap();
    assert!(report.tasks.is_empty());
    assert_eq!(report.stats.resumptions, 0);
}

#[test]
fn test_primes_workload() {
    let report = run_primes(&SchedulerConfig::default(), 12);

    assert_eq!(
        report.tasks[0].value,
        Some(Value::List(vec![2, 3, 7, 11, 29, 47, 199]))
    );
    // One resumption per ruled-out divisor and per decided item, plus the
    // final one that returns the matches.
    assert_eq!(report.stats.resumptions, 39);
    assert_eq!(report.stats.suspensions, 38);
}

#[test]
fn test_demo_workload() {
    let report = run_demo(&SchedulerConfig::default());
    let by_label = |label: &str| {
        report
            .tasks
            .iter()
            .find(|task| task.label == label)
            .unwrap_or_else(|| panic!("no task labelled {}", label))
    };

    assert_eq!(by_label("search(digits >= 7)").value, Some(Value::Number(1_149_851)));
    assert_eq!(by_label("search(digits >= 9)").value, Some(Value::Number(141_422_324)));
    assert_eq!(
        by_label("primes(first 12)").value,
        Some(Value::List(vec![2, 3, 7, 11, 29, 47, 199]))
    );
    assert_eq!(by_label("repeat_message").value, Some(Value::Number(2)));

    let exhausted = by_label("search(first 10, >= 7)");
    assert_eq!(exhausted.state, TaskState::Failed);
    assert_eq!(exhausted.error.as_deref(), Some("Not found"));

    let malformed = by_label("malformed");
    assert_eq!(malformed.state, TaskState::Failed);
    assert_eq!(
        malformed.error.as_deref(),
        Some("protocol violation: suspension carried a payload: Some(1)")
    );

    // The launcher reports the id of the search it spawned.
    let launcher = by_label("launcher");
    assert_eq!(launcher.value, Some(Value::Number(7)));
    let spawned = &report.tasks[7];
    assert_eq!(spawned.id, TaskId(7));
    assert_eq!(spawned.value, Some(Value::Number(10_749_957_122)));

    assert_eq!(report.stats.tasks_added, 8);
    assert_eq!(report.stats.tasks_completed, 6);
    assert_eq!(report.stats.tasks_failed, 2);
    assert_eq!(report.resolution_order.len(), 8);
    assert_eq!(report.resolution_order[0], malformed.id);
    assert_eq!(report.resolution_order[1], launcher.id);
}
