use std::fmt;

use uuid::Uuid;

/// The dependency graph contains at least one cycle, so no schedule exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    /// Every task that sits on a cycle, sorted ascending.
    pub task_ids: Vec<Uuid>,
    /// The individual cycles (strongly connected components), each sorted.
    pub cycles: Vec<Vec<Uuid>>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.task_ids.iter().map(|id| id.to_string()).collect();
        write!(
            f,
            "Circular dependency between {} task(s): {}. Remove one of the links to continue.",
            self.task_ids.len(),
            ids.join(", ")
        )
    }
}

impl std::error::Error for CycleError {}

/// Which end of a dependency a link error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Successor,
    Predecessor,
}

/// A dependency or task record that cannot take part in scheduling.
///
/// Link errors are reported per record; the offending edge is skipped and the
/// rest of the graph is still scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The dependency points at a task id that is not in the task set.
    MissingReference {
        dependency_id: Uuid,
        task_id: Uuid,
        endpoint: Endpoint,
    },
    /// The dependency links a task to itself.
    SelfReference { dependency_id: Uuid, task_id: Uuid },
    /// Two tasks share the same id; only the first one is scheduled.
    DuplicateTask { task_id: Uuid },
    /// The lag or lead exceeds `Dependency::MAX_LAG_DAYS`.
    LagOutOfRange { dependency_id: Uuid, lag_days: i64 },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::MissingReference {
                dependency_id,
                task_id,
                endpoint,
            } => {
                let role = match endpoint {
                    Endpoint::Successor => "dependent task",
                    Endpoint::Predecessor => "predecessor",
                };
                write!(
                    f,
                    "Dependency {dependency_id} refers to unknown {role} {task_id}; the link is ignored"
                )
            }
            LinkError::SelfReference {
                dependency_id,
                task_id,
            } => write!(
                f,
                "Dependency {dependency_id} makes task {task_id} depend on itself; the link is ignored"
            ),
            LinkError::DuplicateTask { task_id } => {
                write!(f, "Task id {task_id} appears more than once; later copies are ignored")
            }
            LinkError::LagOutOfRange {
                dependency_id,
                lag_days,
            } => write!(
                f,
                "Dependency {dependency_id} has a lag of {lag_days} days, outside the schedulable range; the link is ignored"
            ),
        }
    }
}

impl std::error::Error for LinkError {}

/// Failure of a conflict-resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    UnknownTask(Uuid),
    /// Manual dates with the end before the start.
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    Cycle(CycleError),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownTask(id) => write!(f, "Task {id} does not exist"),
            ResolveError::InvalidRange { start, end } => write!(
                f,
                "End date {} is before start date {}",
                end.format("%Y-%m-%d"),
                start.format("%Y-%m-%d")
            ),
            ResolveError::Cycle(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Cycle(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CycleError> for ResolveError {
    fn from(err: CycleError) -> Self {
        ResolveError::Cycle(err)
    }
}

/// Failure while loading a project or configuration file.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "Failed to read file: {err}"),
            LoadError::Json(err) => write!(f, "Failed to parse JSON: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json(err)
    }
}

/// Failure writing a schedule export.
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "Failed to write file: {err}"),
            ExportError::Csv(err) => write!(f, "Failed to write CSV: {err}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_tasks() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let err = CycleError {
            task_ids: vec![a, b],
            cycles: vec![vec![a, b]],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 task(s)"));
        assert!(msg.contains(&a.to_string()));
        assert!(msg.contains(&b.to_string()));
    }

    #[test]
    fn missing_reference_names_role() {
        let err = LinkError::MissingReference {
            dependency_id: Uuid::from_u128(9),
            task_id: Uuid::from_u128(3),
            endpoint: Endpoint::Predecessor,
        };
        assert!(err.to_string().contains("unknown predecessor"));
    }

    #[test]
    fn lag_error_names_the_lag() {
        let err = LinkError::LagOutOfRange {
            dependency_id: Uuid::from_u128(9),
            lag_days: 200_000_000,
        };
        assert!(err.to_string().contains("200000000 days"));
    }
}
