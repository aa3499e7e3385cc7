pub mod project;
pub mod record;
pub mod task;

pub use project::Project;
pub use record::{parse_date, ProjectRecord, TaskRecord};
pub use task::{Dependency, DependencyKind, Interval, Task};
