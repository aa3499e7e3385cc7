//! Task-dependency scheduling and chart layout engine.
//!
//! A pure pipeline recomputed whenever its inputs change:
//!
//! - **`model`**: `Task`, `Dependency`, wire records with ISO-8601 dates and
//!   the placeholder interval policy for undated tasks.
//! - **`schedule`**: per-link FS/SS/FF/SF constraints, topological
//!   propagation into an earliest-feasible schedule, violation reporting and
//!   the auto-fix / manual resolution actions.
//! - **`io`**: JSON project and config loading, CSV schedule export.
//! - **`layout`**: Gantt timeline geometry, dependency line routing and the
//!   force-directed network layout.
//!
//! Every function takes `today`, zoom and configuration explicitly and
//! returns fresh values; callers replace their previous snapshot wholesale.

pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod model;
pub mod schedule;

pub use config::EngineConfig;
pub use error::{CycleError, ExportError, LinkError, LoadError, ResolveError};
pub use model::{Dependency, DependencyKind, Interval, Project, Task};
pub use schedule::{propagate, resolve, ResolveStrategy, Schedule, UpdatedTask, Violation};
