//! Constraint propagation over the whole dependency graph.
//!
//! Tasks are visited in topological order (predecessors first, Kahn's
//! algorithm). Each task takes the tightest bound over its incoming links,
//! evaluated against the already-resolved predecessor dates, and is shifted
//! forward with its duration intact when that bound is stricter than its
//! current dates.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks";
//! Tarjan (1972), "Depth-first search and linear graph algorithms"

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use uuid::Uuid;

use super::constraint::{bound_for, shift_to_satisfy, ConstraintBound, Violation};
use crate::config::EngineConfig;
use crate::error::{CycleError, Endpoint, LinkError};
use crate::model::task::add_days;
use crate::model::{Dependency, Interval, Task};

/// Result of one propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Task ids in the order they were resolved.
    pub order: Vec<Uuid>,
    /// Earliest feasible interval per task.
    pub intervals: BTreeMap<Uuid, Interval>,
    /// Tasks whose interval derives from real dates: dated tasks, and
    /// undated tasks placed by at least one anchored predecessor. Only
    /// these constrain their successors.
    pub anchored: BTreeSet<Uuid>,
    /// Every violated link found in the pass, in resolution order.
    pub violations: Vec<Violation>,
    /// Records that were skipped.
    pub link_errors: Vec<LinkError>,
}

impl Schedule {
    pub fn interval(&self, task_id: Uuid) -> Option<Interval> {
        self.intervals.get(&task_id).copied()
    }

    pub fn is_anchored(&self, task_id: Uuid) -> bool {
        self.anchored.contains(&task_id)
    }

    pub fn violations_for(&self, task_id: Uuid) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.task_id == task_id)
    }

    pub fn has_conflicts(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// The validated graph: task indices plus usable edges.
pub(crate) struct Graph<'a> {
    pub tasks: Vec<&'a Task>,
    pub index: HashMap<Uuid, usize>,
    /// Usable dependencies, sorted by id.
    pub edges: Vec<&'a Dependency>,
    /// Per task, indices into `edges` where the task is the successor.
    pub incoming: Vec<Vec<usize>>,
    /// Per task, successor task indices.
    pub outgoing: Vec<Vec<usize>>,
    pub errors: Vec<LinkError>,
}

impl<'a> Graph<'a> {
    pub fn build(tasks: &'a [Task], dependencies: &'a [Dependency]) -> Self {
        let mut errors = Vec::new();
        let mut index = HashMap::with_capacity(tasks.len());
        let mut unique = Vec::with_capacity(tasks.len());
        for task in tasks {
            if index.contains_key(&task.id) {
                errors.push(LinkError::DuplicateTask { task_id: task.id });
                continue;
            }
            index.insert(task.id, unique.len());
            unique.push(task);
        }

        let mut edges: Vec<&Dependency> = Vec::with_capacity(dependencies.len());
        for dep in dependencies {
            if dep.from_task_id == dep.to_task_id {
                errors.push(LinkError::SelfReference {
                    dependency_id: dep.id,
                    task_id: dep.from_task_id,
                });
                continue;
            }
            let missing = [
                (dep.from_task_id, Endpoint::Successor),
                (dep.to_task_id, Endpoint::Predecessor),
            ]
            .into_iter()
            .find(|(id, _)| !index.contains_key(id));
            if let Some((task_id, endpoint)) = missing {
                errors.push(LinkError::MissingReference {
                    dependency_id: dep.id,
                    task_id,
                    endpoint,
                });
                continue;
            }
            if !dep.lag_in_range() {
                errors.push(LinkError::LagOutOfRange {
                    dependency_id: dep.id,
                    lag_days: dep.lag_days,
                });
                continue;
            }
            edges.push(dep);
        }
        for err in &errors {
            tracing::warn!("{err}");
        }
        edges.sort_by_key(|d| d.id);

        let mut incoming = vec![Vec::new(); unique.len()];
        let mut outgoing = vec![Vec::new(); unique.len()];
        for (e, dep) in edges.iter().enumerate() {
            let succ = index[&dep.from_task_id];
            let pred = index[&dep.to_task_id];
            incoming[succ].push(e);
            outgoing[pred].push(succ);
        }

        Self {
            tasks: unique,
            index,
            edges,
            incoming,
            outgoing,
            errors,
        }
    }

    /// Kahn's algorithm, ready tasks taken in input order.
    pub fn topological_order(&self) -> Result<Vec<usize>, CycleError> {
        let n = self.tasks.len();
        let mut in_degree: Vec<usize> = self.incoming.iter().map(Vec::len).collect();
        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(i) = ready.pop_first() {
            order.push(i);
            for &succ in &self.outgoing[i] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    ready.insert(succ);
                }
            }
        }

        if order.len() == n {
            return Ok(order);
        }

        let mut visited = vec![false; n];
        for &i in &order {
            visited[i] = true;
        }
        let remainder: Vec<usize> = (0..n).filter(|&i| !visited[i]).collect();
        Err(self.cycle_error(&remainder))
    }

    /// Narrow the unsorted remainder to the nodes that actually sit on a
    /// cycle; tasks merely downstream of one are dropped.
    fn cycle_error(&self, remainder: &[usize]) -> CycleError {
        let mut in_remainder = vec![false; self.tasks.len()];
        for &i in remainder {
            in_remainder[i] = true;
        }
        let mut tarjan = Tarjan::new(self.tasks.len());
        for &i in remainder {
            if tarjan.index[i].is_none() {
                tarjan.visit(i, &self.outgoing, &in_remainder);
            }
        }

        let mut cycles: Vec<Vec<Uuid>> = tarjan
            .components
            .into_iter()
            .filter(|c| c.len() > 1)
            .map(|c| {
                let mut ids: Vec<Uuid> = c.into_iter().map(|i| self.tasks[i].id).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        let mut task_ids: Vec<Uuid> = cycles.iter().flatten().copied().collect();
        task_ids.sort();
        CycleError { task_ids, cycles }
    }
}

struct Tarjan {
    next: usize,
    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl Tarjan {
    fn new(n: usize) -> Self {
        Self {
            next: 0,
            index: vec![None; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn visit(&mut self, v: usize, adj: &[Vec<usize>], allowed: &[bool]) {
        self.index[v] = Some(self.next);
        self.low[v] = self.next;
        self.next += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        for &w in &adj[v] {
            if !allowed[w] {
                continue;
            }
            match self.index[w] {
                None => {
                    self.visit(w, adj, allowed);
                    self.low[v] = self.low[v].min(self.low[w]);
                }
                Some(w_index) if self.on_stack[w] => {
                    self.low[v] = self.low[v].min(w_index);
                }
                Some(_) => {}
            }
        }

        if Some(self.low[v]) == self.index[v] {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}

/// Earliest interval of `duration` days satisfying `bound`.
fn earliest(bound: ConstraintBound, duration: i64) -> Option<NaiveDate> {
    let from_end = bound.min_end.map(|end| add_days(end, -duration));
    match (bound.min_start, from_end) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Resolve the earliest feasible schedule for `tasks`.
///
/// Fails only on cycles. Unknown, self-referencing and out-of-range links
/// are reported in [`Schedule::link_errors`] and skipped. Output is a pure
/// function of the input slices, `today` and `config`.
pub fn propagate(
    tasks: &[Task],
    dependencies: &[Dependency],
    today: NaiveDate,
    config: &EngineConfig,
) -> Result<Schedule, CycleError> {
    let graph = Graph::build(tasks, dependencies);
    let order = graph.topological_order().map_err(|err| {
        tracing::warn!(tasks = err.task_ids.len(), "dependency cycle, propagation aborted");
        err
    })?;

    let n = graph.tasks.len();
    let mut resolved: Vec<Option<Interval>> = vec![None; n];
    // Whether a task's interval derives from real dates somewhere upstream.
    let mut anchored = vec![false; n];
    let mut violations = Vec::new();

    for &i in &order {
        let task = graph.tasks[i];
        let base = task.interval(today, config.placeholder_days);
        let mut bound = ConstraintBound::default();
        let mut applied = Vec::new();

        for &e in &graph.incoming[i] {
            let dep = graph.edges[e];
            let p = graph.index[&dep.to_task_id];
            let Some(pred_interval) = resolved[p] else {
                continue;
            };
            if !anchored[p] {
                continue;
            }
            let edge_bound = bound_for(dep, &pred_interval);
            bound = bound.tighten(edge_bound);
            applied.push((dep, p, edge_bound));
        }

        let interval = if task.start_date.is_none() && task.end_date.is_none() {
            match earliest(bound, base.duration_days()) {
                Some(start) => base.starting_at(start),
                None => base,
            }
        } else {
            shift_to_satisfy(base, bound)
        };

        if let Some(current) = task.dates() {
            for (dep, p, edge_bound) in &applied {
                if !edge_bound.is_satisfied_by(&current) {
                    violations.push(Violation::new(
                        dep,
                        task,
                        graph.tasks[*p],
                        current,
                        interval,
                    ));
                }
            }
        }

        anchored[i] = task.is_dated() || !applied.is_empty();
        resolved[i] = Some(interval);
    }

    let mut intervals = BTreeMap::new();
    for (i, interval) in resolved.into_iter().enumerate() {
        if let Some(interval) = interval {
            intervals.insert(graph.tasks[i].id, interval);
        }
    }
    let anchored = (0..n)
        .filter(|&i| anchored[i])
        .map(|i| graph.tasks[i].id)
        .collect();

    tracing::debug!(
        tasks = n,
        links = graph.edges.len(),
        violations = violations.len(),
        skipped = graph.errors.len(),
        "propagation pass complete"
    );

    Ok(Schedule {
        order: order.iter().map(|&i| graph.tasks[i].id).collect(),
        intervals,
        anchored,
        violations,
        link_errors: graph.errors,
    })
}
