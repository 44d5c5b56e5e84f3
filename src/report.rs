//! Run reports
//!
//! Snapshot of a drained scheduler: every task's final state and value,
//! the order tasks resolved in, and the scheduler's counters.

use std::fmt;
use std::fmt::Write as _;

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::runtime::scheduler::{Scheduler, SchedulerStats, TaskId, TaskState};

/// Completion values produced by the bundled workloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(u128),
    List(Vec<u128>),
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(u128::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

/// Final state of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    pub id: TaskId,
    pub label: String,
    pub state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Report for one scheduler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub tasks: Vec<TaskReport>,
    pub resolution_order: Vec<TaskId>,
    pub stats: SchedulerStats,
}

impl RunReport {
    /// Collect the outcome of every labelled task.
    ///
    /// Tasks without a label are reported under their id.
    pub fn collect<E: fmt::Display>(
        scheduler: &Scheduler<Value, E>,
        labels: &[(TaskId, String)],
    ) -> Self {
        let label_of = |id: TaskId| {
            labels
                .iter()
                .find(|(labelled, _)| *labelled == id)
                .map(|(_, label)| label.clone())
                .unwrap_or_else(|| id.to_string())
        };

        let issued = scheduler.stats().tasks_added;
        let tasks = (0..issued)
            .map(TaskId)
            .map(|id| TaskReport {
                id,
                label: label_of(id),
                state: scheduler.state_of(id).unwrap_or(TaskState::Ready),
                value: scheduler.result_of(id).ok().cloned(),
                error: scheduler.error_of(id).ok().map(ToString::to_string),
            })
            .collect();

        Self {
            tasks,
            resolution_order: scheduler.resolution_order().to_vec(),
            stats: scheduler.stats(),
        }
    }

    /// Render as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as human-readable lines.
    pub fn to_text(
        &self,
        color: bool,
    ) -> String {
        let mut out = String::new();
        for task in &self.tasks {
            let detail = match (&task.value, &task.error) {
                (Some(value), _) => value.to_string(),
                (None, Some(error)) => error.clone(),
                (None, None) => String::new(),
            };
            // Pad first; escape codes must not count toward the width.
            let state = format!("{:<9}", task.state.to_string());
            let state = match (color, task.state) {
                (false, _) => state,
                (true, TaskState::Completed) => state.green().to_string(),
                (true, TaskState::Failed | TaskState::Abandoned) => state.red().to_string(),
                (true, TaskState::Ready) => state.yellow().to_string(),
            };
            let _ = writeln!(out, "{} {:<24} {} {}", task.id, task.label, state, detail);
        }

        let order: Vec<String> = self.resolution_order.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "resolved: {}", order.join(" -> "));
        let _ = writeln!(
            out,
            "resumptions: {}, suspensions: {}, completed: {}, failed: {}",
            self.stats.resumptions,
            self.stats.suspensions,
            self.stats.tasks_completed,
            self.stats.tasks_failed
        );
        out
    }
}
