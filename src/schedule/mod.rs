//! Dependency scheduling: per-link constraints, whole-graph propagation and
//! conflict resolution.

pub mod constraint;
pub mod propagate;
pub mod resolve;

pub use constraint::{
    bound_for, check_interval, check_violation, constraint_for, shift_to_satisfy,
    ConstraintBound, Violation,
};
pub use propagate::{propagate, Schedule};
pub use resolve::{auto_fix_all, resolve, ResolveStrategy, UpdatedTask};
