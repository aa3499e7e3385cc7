//! Conflict resolution actions offered to the UI.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::constraint::{check_interval, Violation};
use super::propagate::{propagate, Schedule};
use crate::config::EngineConfig;
use crate::error::{CycleError, ResolveError};
use crate::model::{Dependency, Interval, Task};

/// How the user wants a conflicting task resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum ResolveStrategy {
    /// Move the task to its earliest feasible interval, keeping its duration.
    AutoFix,
    /// Use caller-supplied dates, re-validated against every link.
    Manual { start: NaiveDate, end: NaiveDate },
}

/// Outcome of [`resolve`]. The input task slice is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedTask {
    pub task: Task,
    /// True if the dates differ from the input task.
    pub changed: bool,
    /// Links still violated with the new dates, incoming and outgoing.
    pub violations: Vec<Violation>,
}

impl UpdatedTask {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Resolve one task's conflicts.
pub fn resolve(
    tasks: &[Task],
    dependencies: &[Dependency],
    task_id: Uuid,
    strategy: ResolveStrategy,
    today: NaiveDate,
    config: &EngineConfig,
) -> Result<UpdatedTask, ResolveError> {
    let original = tasks
        .iter()
        .find(|t| t.id == task_id)
        .ok_or(ResolveError::UnknownTask(task_id))?;

    if let ResolveStrategy::Manual { start, end } = strategy {
        if end < start {
            return Err(ResolveError::InvalidRange { start, end });
        }
    }

    let schedule = propagate(tasks, dependencies, today, config)?;

    let mut task = original.clone();
    match strategy {
        ResolveStrategy::AutoFix => {
            // Undated tasks keep no dates: their interval is only a placeholder.
            if let (Some(current), Some(resolved)) = (task.dates(), schedule.interval(task_id)) {
                if current != resolved {
                    task.set_interval(Interval::new(resolved.start, resolved.end));
                }
            }
        }
        ResolveStrategy::Manual { start, end } => {
            task.set_interval(Interval::new(start, end));
        }
    }

    let violations = match task.dates() {
        Some(interval) => validate(tasks, dependencies, &schedule, &task, interval),
        None => Vec::new(),
    };
    let changed = task.start_date != original.start_date || task.end_date != original.end_date;
    if !violations.is_empty() {
        tracing::info!(
            %task_id,
            remaining = violations.len(),
            "resolved dates still violate dependencies"
        );
    }

    Ok(UpdatedTask {
        task,
        changed,
        violations,
    })
}

/// Check `task` placed at `interval` against its anchored predecessors'
/// resolved dates and its successors' current dates.
fn validate(
    tasks: &[Task],
    dependencies: &[Dependency],
    schedule: &Schedule,
    task: &Task,
    interval: Interval,
) -> Vec<Violation> {
    let find = |id: Uuid| tasks.iter().find(|t| t.id == id);
    let mut links: Vec<&Dependency> = dependencies
        .iter()
        .filter(|d| {
            d.touches(task.id) && d.from_task_id != d.to_task_id && d.lag_in_range()
        })
        .collect();
    links.sort_by_key(|d| d.id);

    let mut violations = Vec::new();
    for dep in links {
        if dep.successor() == task.id {
            let Some(pred) = find(dep.predecessor()) else {
                continue;
            };
            // Same rule as propagation: unanchored placeholders bind nothing.
            if !schedule.is_anchored(pred.id) {
                continue;
            }
            let Some(pred_interval) = schedule.interval(pred.id) else {
                continue;
            };
            violations.extend(check_interval(task, interval, pred, pred_interval, dep));
        } else {
            let Some(succ) = find(dep.successor()) else {
                continue;
            };
            let Some(succ_current) = succ.dates() else {
                continue;
            };
            violations.extend(check_interval(succ, succ_current, task, interval, dep));
        }
    }
    violations
}

/// Apply auto-fix to every dated task at once.
///
/// Returns the updated task list in input order; tasks without dates keep
/// none.
pub fn auto_fix_all(
    tasks: &[Task],
    dependencies: &[Dependency],
    today: NaiveDate,
    config: &EngineConfig,
) -> Result<Vec<Task>, CycleError> {
    let schedule = propagate(tasks, dependencies, today, config)?;
    Ok(tasks
        .iter()
        .map(|task| {
            let mut task = task.clone();
            if task.is_dated() {
                if let Some(resolved) = schedule.interval(task.id) {
                    task.set_interval(Interval::new(resolved.start, resolved.end));
                }
            }
            task
        })
        .collect())
}
