use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the type of dependency between two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::FinishToStart,
        DependencyKind::StartToStart,
        DependencyKind::FinishToFinish,
        DependencyKind::StartToFinish,
    ];

    /// Two-letter code used on the wire and as the path label.
    pub fn code(self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "FS",
            DependencyKind::StartToStart => "SS",
            DependencyKind::FinishToFinish => "FF",
            DependencyKind::StartToFinish => "SF",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "finish-to-start",
            DependencyKind::StartToStart => "start-to-start",
            DependencyKind::FinishToFinish => "finish-to-finish",
            DependencyKind::StartToFinish => "start-to-finish",
        }
    }
}

/// A dependency link between two tasks.
///
/// `from_task_id` is the dependent (successor), `to_task_id` the task it
/// depends on (predecessor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: Uuid,
    pub from_task_id: Uuid,
    pub to_task_id: Uuid,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    /// Signed offset in days; negative values are leads.
    #[serde(default)]
    pub lag_days: i64,
}

impl Dependency {
    /// Largest lag or lead accepted, about a century either way.
    pub const MAX_LAG_DAYS: i64 = 36_525;

    pub fn new(successor: Uuid, predecessor: Uuid, kind: DependencyKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_task_id: successor,
            to_task_id: predecessor,
            kind,
            lag_days: 0,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_lag(mut self, lag_days: i64) -> Self {
        self.lag_days = lag_days;
        self
    }

    pub fn successor(&self) -> Uuid {
        self.from_task_id
    }

    pub fn predecessor(&self) -> Uuid {
        self.to_task_id
    }

    /// False for lags too large to schedule; such links are skipped.
    pub fn lag_in_range(&self) -> bool {
        (-Self::MAX_LAG_DAYS..=Self::MAX_LAG_DAYS).contains(&self.lag_days)
    }

    /// True if the link touches `task_id` at either end.
    pub fn touches(&self, task_id: Uuid) -> bool {
        self.from_task_id == task_id || self.to_task_id == task_id
    }
}

/// A single task in the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    /// Inclusive start date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date.
    pub end_date: Option<NaiveDate>,
    /// Optional parent task (for hierarchical grouping).
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Percent complete, 0 to 100.
    #[serde(default)]
    pub progress: u8,
}

impl Task {
    /// Create a dated task. An end before the start is clamped to the start.
    pub fn new(title: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start_date: Some(start),
            end_date: Some(end.max(start)),
            parent_id: None,
            progress: 0,
        }
    }

    /// Create a task without dates; it is laid out on a placeholder interval.
    pub fn undated(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start_date: None,
            end_date: None,
            parent_id: None,
            progress: 0,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    /// Both dates present.
    pub fn is_dated(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    /// The task's real dates, if it has both.
    pub fn dates(&self) -> Option<Interval> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(Interval::new(start, end)),
            _ => None,
        }
    }

    /// The interval used for layout: the real dates, or a placeholder
    /// anchored on whichever date exists (or `today`) spanning
    /// `placeholder_days`. The placeholder is never stored on the task.
    pub fn interval(&self, today: NaiveDate, placeholder_days: i64) -> Interval {
        let span = placeholder_days.max(1);
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Interval::new(start, end),
            (Some(start), None) => Interval::placeholder(start, add_days(start, span)),
            (None, Some(end)) => Interval::placeholder(add_days(end, -span), end),
            (None, None) => Interval::placeholder(today, add_days(today, span)),
        }
    }

    /// Replace the dates with `interval` (only called with real, derived dates).
    pub fn set_interval(&mut self, interval: Interval) {
        self.start_date = Some(interval.start);
        self.end_date = Some(interval.end);
    }
}

/// A closed date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// True when at least one bound was inferred rather than real data.
    #[serde(default)]
    pub placeholder: bool,
}

impl Interval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: end.max(start),
            placeholder: false,
        }
    }

    pub fn placeholder(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            placeholder: true,
            ..Self::new(start, end)
        }
    }

    /// `end - start` in days, never less than one day.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }

    /// Interval of the same (clamped) duration starting at `start`.
    pub fn starting_at(&self, start: NaiveDate) -> Self {
        Self {
            start,
            end: add_days(start, self.duration_days()),
            placeholder: self.placeholder,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// `date` moved by `days`, saturating at the ends of the calendar.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}
