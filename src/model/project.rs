use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::{Dependency, DependencyKind, Task};

/// A snapshot of tasks and dependencies fed to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<Task>,
    pub dependencies: Vec<Dependency>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Generate a sample project for demonstration.
    ///
    /// Contains one deliberate FS violation (QA starts before Backend ends)
    /// and one undated task.
    pub fn sample(today: NaiveDate) -> Self {
        let day = Duration::days;
        let mut project = Project::new("Sample Project");

        let phase1 = Task::new("Planning", today - day(5), today + day(8));
        let t1 = Task::new("Project Kickoff", today - day(5), today - day(2))
            .with_parent(phase1.id)
            .with_progress(100);
        let t2 = Task::new("Requirements Gathering", today - day(2), today + day(5))
            .with_parent(phase1.id)
            .with_progress(60);

        let phase2 = Task::new("Execution", today + day(6), today + day(30));
        let t3 = Task::new("UI Design", today + day(6), today + day(18)).with_parent(phase2.id);
        let t4 = Task::new("Backend Development", today + day(6), today + day(28))
            .with_parent(phase2.id);
        let t5 = Task::new("Testing & QA", today + day(22), today + day(30)).with_parent(phase2.id);
        let launch = Task::new("Launch", today + day(32), today + day(32));
        let docs = Task::undated("User Documentation");

        project.dependencies = vec![
            Dependency::new(t2.id, t1.id, DependencyKind::FinishToStart),
            Dependency::new(t3.id, t2.id, DependencyKind::FinishToStart).with_lag(1),
            Dependency::new(t4.id, t3.id, DependencyKind::StartToStart),
            Dependency::new(t5.id, t4.id, DependencyKind::FinishToStart),
            Dependency::new(launch.id, t5.id, DependencyKind::FinishToStart).with_lag(2),
            Dependency::new(docs.id, t3.id, DependencyKind::FinishToFinish),
        ];
        project.tasks = vec![phase1, t1, t2, phase2, t3, t4, t5, launch, docs];
        project
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_links_resolve() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let project = Project::sample(today);
        for dep in &project.dependencies {
            assert!(project.task(dep.successor()).is_some());
            assert!(project.task(dep.predecessor()).is_some());
        }
    }
}
