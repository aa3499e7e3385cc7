//! End-to-end scheduling and layout scenarios.

use chrono::NaiveDate;
use gantt_engine::config::{EngineConfig, ForceConfig};
use gantt_engine::layout::{bar_geometry, layout, relax, DateRange};
use gantt_engine::schedule::check_violation;
use gantt_engine::{propagate, resolve, Dependency, DependencyKind, ResolveStrategy, Task};
use uuid::Uuid;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

#[test]
fn scenario_a_finish_to_start_violation() {
    let pred = Task::new("Predecessor", d(2024, 1, 1), d(2024, 1, 10)).with_id(id(1));
    let succ = Task::new("Successor", d(2024, 1, 5), d(2024, 1, 8)).with_id(id(2));
    let dep = Dependency::new(succ.id, pred.id, DependencyKind::FinishToStart).with_id(id(10));

    let v = check_violation(&succ, &pred, &dep).expect("FS violation");
    assert_eq!(v.task_id, succ.id);
    assert_eq!(v.predecessor_id, pred.id);
    assert_eq!(v.current_start, d(2024, 1, 5));
    assert_eq!(v.current_end, d(2024, 1, 8));
    assert_eq!(v.required_start, d(2024, 1, 10));
    assert_eq!(v.required_end, d(2024, 1, 13));
}

#[test]
fn scenario_b_start_to_start_with_lag() {
    let pred = Task::new("Predecessor", d(2024, 2, 1), d(2024, 2, 6)).with_id(id(1));
    let succ = Task::new("Successor", d(2024, 2, 1), d(2024, 2, 4)).with_id(id(2));
    let dep = Dependency::new(succ.id, pred.id, DependencyKind::StartToStart)
        .with_id(id(10))
        .with_lag(2);

    let v = check_violation(&succ, &pred, &dep).expect("SS violation");
    assert_eq!(v.kind, DependencyKind::StartToStart);
    assert_eq!(v.required_start, d(2024, 2, 3));
    assert_eq!(v.required_end, d(2024, 2, 6));
}

#[test]
fn scenario_c_two_task_cycle() {
    let a = Task::new("A", d(2024, 1, 1), d(2024, 1, 2)).with_id(id(1));
    let b = Task::new("B", d(2024, 1, 1), d(2024, 1, 2)).with_id(id(2));
    let deps = vec![
        Dependency::new(a.id, b.id, DependencyKind::FinishToStart).with_id(id(10)),
        Dependency::new(b.id, a.id, DependencyKind::FinishToStart).with_id(id(11)),
    ];
    let err = propagate(&[a, b], &deps, d(2024, 1, 1), &EngineConfig::default()).unwrap_err();
    assert_eq!(err.task_ids, vec![id(1), id(2)]);
    assert!(err.to_string().contains("Circular dependency"));
}

#[test]
fn scenario_d_timeline_offset() {
    let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 31));
    let task = Task::new("Offset", d(2024, 1, 3), d(2024, 1, 6));
    let g = bar_geometry(&task, &range, 40.0, d(2024, 1, 1), 7);
    assert_eq!(g.left_px, 80.0);
    assert_eq!(g.width_px, 120.0);
}

#[test]
fn scenario_e_auto_fix_is_a_no_op_when_satisfied() {
    let pred = Task::new("Predecessor", d(2024, 3, 1), d(2024, 3, 4)).with_id(id(1));
    let succ = Task::new("Successor", d(2024, 3, 6), d(2024, 3, 9)).with_id(id(2));
    let deps = vec![Dependency::new(succ.id, pred.id, DependencyKind::FinishToStart).with_id(id(10))];
    let tasks = vec![pred, succ.clone()];

    let out = resolve(
        &tasks,
        &deps,
        succ.id,
        ResolveStrategy::AutoFix,
        d(2024, 3, 1),
        &EngineConfig::default(),
    )
    .unwrap();
    assert!(!out.changed);
    assert_eq!(out.task, succ);
    assert!(out.is_clean());
}

#[test]
fn two_linked_nodes_settle_apart() {
    let day = d(2024, 1, 1);
    let tasks = vec![
        Task::new("A", day, day).with_id(id(1)),
        Task::new("B", day, day).with_id(id(2)),
    ];
    let deps = vec![Dependency::new(id(2), id(1), DependencyKind::FinishToStart)];
    let cfg = ForceConfig::default();

    let settled = layout(&tasks, &deps, &cfg);
    let next = relax(&settled, &deps, &cfg, 1);
    for (a, b) in settled.iter().zip(&next) {
        assert!(a.pos().distance(b.pos()) < 0.05, "still moving: {a:?} -> {b:?}");
    }

    let natural = (cfg.k_repulsion / cfg.k_attraction).cbrt();
    let gap = settled[0].pos().distance(settled[1].pos());
    assert!((gap - natural).abs() < 1.0, "gap {gap}, expected about {natural}");
}

#[test]
fn sample_project_resolves_cleanly_after_fix_all() {
    let today = d(2024, 4, 15);
    let project = gantt_engine::Project::sample(today);
    let cfg = EngineConfig::default();
    let before = propagate(&project.tasks, &project.dependencies, today, &cfg).unwrap();
    assert!(before.has_conflicts());

    let fixed =
        gantt_engine::schedule::auto_fix_all(&project.tasks, &project.dependencies, today, &cfg)
            .unwrap();
    let after = propagate(&fixed, &project.dependencies, today, &cfg).unwrap();
    assert!(!after.has_conflicts());
    // Undated tasks were not given dates.
    assert!(fixed.iter().any(|t| !t.is_dated()));
}

#[test]
fn loaded_project_with_absurd_lag_still_schedules() {
    let json = r#"{
        "name": "Far future",
        "tasks": [
            { "id": "00000000-0000-0000-0000-000000000001", "title": "A",
              "start_date": "2024-01-01", "end_date": "2024-01-05" },
            { "id": "00000000-0000-0000-0000-000000000002", "title": "B",
              "start_date": "2024-01-02", "end_date": "2024-01-03" }
        ],
        "dependencies": [
            { "id": "00000000-0000-0000-0000-00000000000a",
              "from_task_id": "00000000-0000-0000-0000-000000000002",
              "to_task_id": "00000000-0000-0000-0000-000000000001",
              "type": "FS", "lag_days": 200000000 }
        ]
    }"#;
    let project = gantt_engine::io::parse_project(json).unwrap();
    let config = EngineConfig::default();
    let schedule =
        propagate(&project.tasks, &project.dependencies, d(2024, 1, 1), &config).unwrap();
    assert_eq!(schedule.link_errors.len(), 1);
    assert!(schedule.violations.is_empty());
    assert_eq!(schedule.interval(id(2)).unwrap().start, d(2024, 1, 2));
}
