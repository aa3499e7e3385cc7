//! Property-based invariants of the scheduling and layout engine.
//!
//! 1. Auto-fix preserves duration and is idempotent.
//! 2. Propagation of an acyclic graph leaves no residual violation.
//! 3. Reported cycles are non-empty and contain only nodes on a cycle.
//! 4. Bar offsets are linear in the start date.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use gantt_engine::config::EngineConfig;
use gantt_engine::layout::{bar_geometry, DateRange};
use gantt_engine::schedule::{bound_for, check_violation};
use gantt_engine::{propagate, resolve, Dependency, DependencyKind, ResolveStrategy, Task};
use proptest::prelude::*;
use uuid::Uuid;

// ── Helpers ─────────────────────────────────────────────────────────────

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn dated(n: u128, offset: i64, duration: i64) -> Task {
    let start = epoch() + Duration::days(offset);
    Task::new(format!("T{n}"), start, start + Duration::days(duration)).with_id(Uuid::from_u128(n))
}

fn kind_strategy() -> impl Strategy<Value = DependencyKind> {
    prop::sample::select(DependencyKind::ALL.to_vec())
}

/// Tasks `1..=n` with random dates and durations of at least one day.
fn tasks_strategy(max: usize) -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((0i64..60, 1i64..10), 2..max).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (offset, duration))| dated(i as u128 + 1, offset, duration))
            .collect()
    })
}

/// Edge list as (successor index, predecessor index, kind, lag).
type RawEdge = (usize, usize, DependencyKind, i64);

fn edges_strategy() -> impl Strategy<Value = Vec<RawEdge>> {
    prop::collection::vec((0usize..32, 0usize..32, kind_strategy(), -5i64..6), 0..24)
}

fn to_dependencies(tasks: &[Task], raw: &[RawEdge], acyclic: bool) -> Vec<Dependency> {
    let n = tasks.len();
    raw.iter()
        .enumerate()
        .filter_map(|(k, &(a, b, kind, lag))| {
            let (a, b) = (a % n, b % n);
            if a == b {
                return None;
            }
            // Acyclic graphs only link a later task to an earlier predecessor.
            let (succ, pred) = if acyclic { (a.max(b), a.min(b)) } else { (a, b) };
            Some(
                Dependency::new(tasks[succ].id, tasks[pred].id, kind)
                    .with_id(Uuid::from_u128(1000 + k as u128))
                    .with_lag(lag),
            )
        })
        .collect()
}

/// True if `start` can reach itself following predecessor → successor links.
fn on_cycle(start: Uuid, deps: &[Dependency]) -> bool {
    let mut stack: Vec<Uuid> = deps
        .iter()
        .filter(|d| d.to_task_id == start)
        .map(|d| d.from_task_id)
        .collect();
    let mut seen = HashSet::new();
    while let Some(node) = stack.pop() {
        if node == start {
            return true;
        }
        if seen.insert(node) {
            stack.extend(deps.iter().filter(|d| d.to_task_id == node).map(|d| d.from_task_id));
        }
    }
    false
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Auto-fix preserves duration and is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn auto_fix_preserves_duration(
        pred_offset in 0i64..40,
        pred_duration in 0i64..15,
        succ_offset in 0i64..40,
        succ_duration in 1i64..15,
        kind in kind_strategy(),
        lag in -10i64..10,
    ) {
        let pred = dated(1, pred_offset, pred_duration);
        let succ = dated(2, succ_offset, succ_duration);
        let dep = Dependency::new(succ.id, pred.id, kind).with_id(Uuid::from_u128(10)).with_lag(lag);

        if let Some(v) = check_violation(&succ, &pred, &dep) {
            prop_assert_eq!((v.required_end - v.required_start).num_days(), succ_duration);
            prop_assert!(v.required_start > v.current_start);

            let tasks = vec![pred.clone(), succ.clone()];
            let out = resolve(
                &tasks,
                std::slice::from_ref(&dep),
                succ.id,
                ResolveStrategy::AutoFix,
                epoch(),
                &EngineConfig::default(),
            )
            .unwrap();
            prop_assert_eq!(out.task.start_date, Some(v.required_start));
            prop_assert_eq!(out.task.end_date, Some(v.required_end));
            prop_assert!(out.is_clean());
            prop_assert!(check_violation(&out.task, &pred, &dep).is_none());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. No residual violations after propagating an acyclic graph
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn acyclic_propagation_satisfies_every_link(
        tasks in tasks_strategy(10),
        raw in edges_strategy(),
    ) {
        let deps = to_dependencies(&tasks, &raw, true);
        let schedule = propagate(&tasks, &deps, epoch(), &EngineConfig::default()).unwrap();
        prop_assert_eq!(schedule.order.len(), tasks.len());

        for dep in &deps {
            let pred = schedule.interval(dep.to_task_id).unwrap();
            let succ = schedule.interval(dep.from_task_id).unwrap();
            prop_assert!(bound_for(dep, &pred).is_satisfied_by(&succ));
        }
        for task in &tasks {
            let resolved = schedule.interval(task.id).unwrap();
            let current = task.dates().unwrap();
            prop_assert!(resolved.start >= current.start);
            prop_assert_eq!(resolved.duration_days(), current.duration_days());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Cycle reports name only nodes on a cycle
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cycle_errors_are_exact(
        tasks in tasks_strategy(8),
        raw in edges_strategy(),
    ) {
        let deps = to_dependencies(&tasks, &raw, false);
        let cyclic: Vec<Uuid> = tasks.iter().map(|t| t.id).filter(|id| on_cycle(*id, &deps)).collect();

        match propagate(&tasks, &deps, epoch(), &EngineConfig::default()) {
            Ok(_) => prop_assert!(cyclic.is_empty()),
            Err(err) => {
                prop_assert!(!err.task_ids.is_empty());
                prop_assert_eq!(err.task_ids, cyclic);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Bar offsets are linear in the start date
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bar_left_is_linear(offset in 0i64..1000, duration in 0i64..30, width in 1u8..80) {
        let range = DateRange::new(epoch(), epoch() + Duration::days(2000));
        let day_width = f32::from(width);
        let a = dated(1, offset, duration);
        let b = dated(2, offset + 1, duration);
        let ga = bar_geometry(&a, &range, day_width, epoch(), 7);
        let gb = bar_geometry(&b, &range, day_width, epoch(), 7);
        prop_assert_eq!(gb.left_px - ga.left_px, day_width);
        prop_assert_eq!(ga.width_px, gb.width_px);
    }
}
