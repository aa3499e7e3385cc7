//! Constraint model: what a single dependency demands of its successor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::task::add_days;
use crate::model::{Dependency, DependencyKind, Interval, Task};

/// Lower bounds a dependency places on its successor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintBound {
    pub min_start: Option<NaiveDate>,
    pub min_end: Option<NaiveDate>,
}

impl ConstraintBound {
    /// Combine two bounds, keeping the later date of each kind.
    pub fn tighten(self, other: ConstraintBound) -> ConstraintBound {
        ConstraintBound {
            min_start: later(self.min_start, other.min_start),
            min_end: later(self.min_end, other.min_end),
        }
    }

    pub fn is_satisfied_by(&self, interval: &Interval) -> bool {
        self.min_start.map_or(true, |min| interval.start >= min)
            && self.min_end.map_or(true, |min| interval.end >= min)
    }
}

fn later(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// The bound a dependency of `kind` imposes, given the predecessor's dates.
pub fn constraint_for(
    kind: DependencyKind,
    predecessor_start: NaiveDate,
    predecessor_end: NaiveDate,
    lag_days: i64,
) -> ConstraintBound {
    let after_end = add_days(predecessor_end, lag_days);
    let after_start = add_days(predecessor_start, lag_days);
    match kind {
        DependencyKind::FinishToStart => ConstraintBound {
            min_start: Some(after_end),
            min_end: None,
        },
        DependencyKind::StartToStart => ConstraintBound {
            min_start: Some(after_start),
            min_end: None,
        },
        DependencyKind::FinishToFinish => ConstraintBound {
            min_start: None,
            min_end: Some(after_end),
        },
        DependencyKind::StartToFinish => ConstraintBound {
            min_start: None,
            min_end: Some(after_start),
        },
    }
}

/// Move `interval` forward by the smallest amount that satisfies `bound`,
/// keeping its duration. Returns it untouched if already satisfied.
pub fn shift_to_satisfy(interval: Interval, bound: ConstraintBound) -> Interval {
    if bound.is_satisfied_by(&interval) {
        return interval;
    }
    let duration = interval.duration_days();
    let mut start = interval.start;
    if let Some(min_start) = bound.min_start {
        start = start.max(min_start);
    }
    if let Some(min_end) = bound.min_end {
        start = start.max(add_days(min_end, -duration));
    }
    interval.starting_at(start)
}

/// A dependency the successor's current dates do not honour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub task_id: Uuid,
    pub predecessor_id: Uuid,
    pub dependency_id: Uuid,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    pub message: String,
    pub current_start: NaiveDate,
    pub current_end: NaiveDate,
    pub required_start: NaiveDate,
    pub required_end: NaiveDate,
}

impl Violation {
    pub(crate) fn new(
        dependency: &Dependency,
        successor: &Task,
        predecessor: &Task,
        current: Interval,
        required: Interval,
    ) -> Self {
        let verb = match dependency.kind {
            DependencyKind::FinishToStart | DependencyKind::StartToStart => "start",
            DependencyKind::FinishToFinish | DependencyKind::StartToFinish => "finish",
        };
        let anchor = match dependency.kind {
            DependencyKind::FinishToStart | DependencyKind::StartToStart => required.start,
            DependencyKind::FinishToFinish | DependencyKind::StartToFinish => required.end,
        };
        let lag = match dependency.lag_days {
            0 => String::new(),
            n if n > 0 => format!(", lag {n}d"),
            n => format!(", lead {}d", -n),
        };
        let message = format!(
            "'{}' must {} no earlier than {} ({} on '{}'{})",
            successor.title,
            verb,
            anchor.format("%Y-%m-%d"),
            dependency.kind.describe(),
            predecessor.title,
            lag,
        );
        Self {
            task_id: successor.id,
            predecessor_id: predecessor.id,
            dependency_id: dependency.id,
            kind: dependency.kind,
            message,
            current_start: current.start,
            current_end: current.end,
            required_start: required.start,
            required_end: required.end,
        }
    }

    pub fn current(&self) -> Interval {
        Interval::new(self.current_start, self.current_end)
    }

    pub fn required(&self) -> Interval {
        Interval::new(self.required_start, self.required_end)
    }

    /// Days the successor has to move to satisfy the dependency.
    pub fn shift_days(&self) -> i64 {
        (self.required_start - self.current_start).num_days()
    }
}

/// Bound imposed by `dependency` when the predecessor occupies `predecessor`.
pub fn bound_for(dependency: &Dependency, predecessor: &Interval) -> ConstraintBound {
    constraint_for(
        dependency.kind,
        predecessor.start,
        predecessor.end,
        dependency.lag_days,
    )
}

/// Check one dependency against the two tasks' current dates.
///
/// Tasks without real dates cannot violate or impose anything and yield
/// `None`. The required interval is the duration-preserving shift of the
/// successor, so feeding it back in yields `None` again.
pub fn check_violation(
    successor: &Task,
    predecessor: &Task,
    dependency: &Dependency,
) -> Option<Violation> {
    let current = successor.dates()?;
    let pred = predecessor.dates()?;
    check_interval(successor, current, predecessor, pred, dependency)
}

/// Like [`check_violation`] but with explicit intervals, used when either
/// side has already been moved by propagation or a manual edit.
pub fn check_interval(
    successor: &Task,
    current: Interval,
    predecessor: &Task,
    predecessor_interval: Interval,
    dependency: &Dependency,
) -> Option<Violation> {
    let bound = bound_for(dependency, &predecessor_interval);
    if bound.is_satisfied_by(&current) {
        return None;
    }
    let required = shift_to_satisfy(current, bound);
    Some(Violation::new(
        dependency,
        successor,
        predecessor,
        current,
        required,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn pair(
        pred: (NaiveDate, NaiveDate),
        succ: (NaiveDate, NaiveDate),
        kind: DependencyKind,
        lag: i64,
    ) -> (Task, Task, Dependency) {
        let p = Task::new("Pred", pred.0, pred.1).with_id(Uuid::from_u128(1));
        let s = Task::new("Succ", succ.0, succ.1).with_id(Uuid::from_u128(2));
        let dep = Dependency::new(s.id, p.id, kind)
            .with_id(Uuid::from_u128(10))
            .with_lag(lag);
        (p, s, dep)
    }

    #[test]
    fn bounds_per_kind() {
        let (s, e) = (d(2024, 1, 1), d(2024, 1, 10));
        let fs = constraint_for(DependencyKind::FinishToStart, s, e, 2);
        assert_eq!(fs.min_start, Some(d(2024, 1, 12)));
        assert_eq!(fs.min_end, None);

        let ss = constraint_for(DependencyKind::StartToStart, s, e, 0);
        assert_eq!(ss.min_start, Some(s));

        let ff = constraint_for(DependencyKind::FinishToFinish, s, e, -3);
        assert_eq!(ff.min_end, Some(d(2024, 1, 7)));
        assert_eq!(ff.min_start, None);

        let sf = constraint_for(DependencyKind::StartToFinish, s, e, 1);
        assert_eq!(sf.min_end, Some(d(2024, 1, 2)));
    }

    #[test]
    fn finish_to_finish_shift_keeps_duration() {
        let (p, s, dep) = pair(
            (d(2024, 1, 1), d(2024, 1, 20)),
            (d(2024, 1, 2), d(2024, 1, 6)),
            DependencyKind::FinishToFinish,
            0,
        );
        let v = check_violation(&s, &p, &dep).unwrap();
        assert_eq!(v.required_end, d(2024, 1, 20));
        assert_eq!(v.required_start, d(2024, 1, 16));
        assert_eq!(v.shift_days(), 14);
        assert!(v.message.contains("finish-to-finish"));
    }

    #[test]
    fn satisfied_dependency_has_no_violation() {
        let (p, s, dep) = pair(
            (d(2024, 1, 1), d(2024, 1, 5)),
            (d(2024, 1, 5), d(2024, 1, 9)),
            DependencyKind::FinishToStart,
            0,
        );
        assert!(check_violation(&s, &p, &dep).is_none());
    }

    #[test]
    fn negative_lag_allows_overlap() {
        let (p, s, dep) = pair(
            (d(2024, 1, 1), d(2024, 1, 10)),
            (d(2024, 1, 8), d(2024, 1, 12)),
            DependencyKind::FinishToStart,
            -2,
        );
        assert!(check_violation(&s, &p, &dep).is_none());
    }

    #[test]
    fn single_day_task_moves_with_one_day_minimum() {
        let (p, s, dep) = pair(
            (d(2024, 1, 1), d(2024, 1, 10)),
            (d(2024, 1, 3), d(2024, 1, 3)),
            DependencyKind::FinishToStart,
            0,
        );
        let v = check_violation(&s, &p, &dep).unwrap();
        assert_eq!(v.required_start, d(2024, 1, 10));
        assert_eq!(v.required_end, d(2024, 1, 11));
    }

    #[test]
    fn fixed_successor_no_longer_violates() {
        let (p, mut s, dep) = pair(
            (d(2024, 3, 1), d(2024, 3, 15)),
            (d(2024, 3, 2), d(2024, 3, 4)),
            DependencyKind::StartToFinish,
            20,
        );
        let v = check_violation(&s, &p, &dep).unwrap();
        s.set_interval(v.required());
        assert!(check_violation(&s, &p, &dep).is_none());
    }

    #[test]
    fn undated_tasks_are_never_violations() {
        let (p, _, _) = pair(
            (d(2024, 1, 1), d(2024, 1, 10)),
            (d(2024, 1, 1), d(2024, 1, 2)),
            DependencyKind::FinishToStart,
            0,
        );
        let s = Task::undated("Floating");
        let dep = Dependency::new(s.id, p.id, DependencyKind::FinishToStart);
        assert!(check_violation(&s, &p, &dep).is_none());
    }

    #[test]
    fn tighten_keeps_latest() {
        let a = ConstraintBound {
            min_start: Some(d(2024, 1, 5)),
            min_end: None,
        };
        let b = ConstraintBound {
            min_start: Some(d(2024, 1, 3)),
            min_end: Some(d(2024, 1, 9)),
        };
        let t = a.tighten(b);
        assert_eq!(t.min_start, Some(d(2024, 1, 5)));
        assert_eq!(t.min_end, Some(d(2024, 1, 9)));
    }
}
