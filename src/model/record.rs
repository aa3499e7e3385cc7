//! Wire-format records as delivered by the data source.
//!
//! Dates arrive as ISO-8601 strings. Converting a record into a [`Task`]
//! parses them; anything unparsable is dropped to `None` so the task falls
//! back to the placeholder interval instead of failing the whole load.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::Project;
use super::task::{Dependency, Task};

/// A task as received from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub progress: f64,
}

/// A whole project snapshot as received from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

fn default_name() -> String {
    "Untitled Project".to_string()
}

/// Parse an ISO-8601 date or timestamp, keeping only the calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn parse_field(task_id: Uuid, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    let parsed = parse_date(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        tracing::warn!(%task_id, field, value = raw, "unparsable date, using placeholder interval");
    }
    parsed
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        let start = parse_field(record.id, "start_date", record.start_date.as_deref());
        let mut end = parse_field(record.id, "end_date", record.end_date.as_deref());
        if let (Some(s), Some(e)) = (start, end) {
            if e < s {
                tracing::warn!(task_id = %record.id, start = %s, end = %e, "end before start, clamping");
                end = Some(s);
            }
        }
        let progress = if record.progress.is_finite() {
            record.progress.round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        Task {
            id: record.id,
            title: record.title,
            start_date: start,
            end_date: end,
            parent_id: record.parent_id,
            progress,
        }
    }
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Project {
            name: record.name,
            tasks: record.tasks.into_iter().map(Task::from).collect(),
            dependencies: record.dependencies,
        }
    }
}
