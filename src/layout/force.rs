//! Force-directed layout for the network view.
//!
//! Implements a simple force-directed layout using:
//! - Repulsive forces between all node pairs, `k_repulsion / d^2`
//! - Attractive forces along edges, `d * k_attraction`
//! - Velocity damping and a per-step speed cap for stability
//!
//! Positions are a value: [`layout`] builds a fresh snapshot and [`relax`]
//! returns a new one, nothing is mutated behind the caller's back.

use std::collections::HashMap;
use std::f32::consts::TAU;

use egui::{pos2, vec2, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ForceConfig;
use crate::model::{Dependency, Task};

/// Simulation state of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub task_id: Uuid,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl NodePosition {
    pub fn pos(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    /// Square around the node, used to route edges in the network view.
    pub fn rect(&self, radius: f32) -> Rect {
        Rect::from_center_size(self.pos(), Vec2::splat(radius * 2.0))
    }
}

/// Place every node on a circle around the canvas centre, in task order.
pub fn initial_positions(tasks: &[Task], config: &ForceConfig) -> Vec<NodePosition> {
    let center = pos2(config.width / 2.0, config.height / 2.0);
    let radius = config.radius_fraction * config.width.min(config.height) / 2.0;
    let n = tasks.len();
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let p = if n == 1 {
                center
            } else {
                let angle = TAU * i as f32 / n as f32;
                center + vec2(angle.cos(), angle.sin()) * radius
            };
            NodePosition {
                task_id: task.id,
                x: p.x,
                y: p.y,
                vx: 0.0,
                vy: 0.0,
            }
        })
        .collect()
}

/// Lay out `tasks` from scratch, running `config.iterations` steps.
pub fn layout(
    tasks: &[Task],
    dependencies: &[Dependency],
    config: &ForceConfig,
) -> Vec<NodePosition> {
    let start = initial_positions(tasks, config);
    let out = relax(&start, dependencies, config, config.iterations);
    tracing::debug!(nodes = out.len(), iterations = config.iterations, "force layout complete");
    out
}

/// Continue a simulation from `positions` for `iterations` more steps.
///
/// Edges whose endpoints are not in `positions` are ignored.
pub fn relax(
    positions: &[NodePosition],
    dependencies: &[Dependency],
    config: &ForceConfig,
    iterations: usize,
) -> Vec<NodePosition> {
    let index: HashMap<Uuid, usize> = positions
        .iter()
        .enumerate()
        .map(|(i, p)| (p.task_id, i))
        .collect();
    let edges: Vec<(usize, usize)> = dependencies
        .iter()
        .filter_map(|d| {
            let a = *index.get(&d.from_task_id)?;
            let b = *index.get(&d.to_task_id)?;
            (a != b).then_some((a, b))
        })
        .collect();

    let mut nodes = positions.to_vec();
    let mut forces = vec![Vec2::ZERO; nodes.len()];
    for _ in 0..iterations {
        step(&mut nodes, &edges, &mut forces, config);
    }
    nodes
}

fn step(nodes: &mut [NodePosition], edges: &[(usize, usize)], forces: &mut [Vec2], config: &ForceConfig) {
    forces.iter_mut().for_each(|f| *f = Vec2::ZERO);

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let (dir, dist) = separation(nodes[i].pos(), nodes[j].pos());
            let push = dir * (config.k_repulsion / (dist * dist));
            forces[i] += push;
            forces[j] -= push;
        }
    }

    for &(a, b) in edges {
        let delta = nodes[b].pos() - nodes[a].pos();
        let dist = delta.length();
        if dist == 0.0 {
            continue;
        }
        let pull = delta / dist * (dist * config.k_attraction);
        forces[a] += pull;
        forces[b] -= pull;
    }

    let (min_x, max_x) = (config.margin, (config.width - config.margin).max(config.margin));
    let (min_y, max_y) = (config.margin, (config.height - config.margin).max(config.margin));
    for (node, force) in nodes.iter_mut().zip(forces.iter()) {
        let mut v = (vec2(node.vx, node.vy) + *force) * config.damping;
        let speed = v.length();
        if speed > config.max_speed {
            v *= config.max_speed / speed;
        }
        let mut x = node.x + v.x;
        let mut y = node.y + v.y;
        if x < min_x || x > max_x {
            x = x.clamp(min_x, max_x);
            v.x = 0.0;
        }
        if y < min_y || y > max_y {
            y = y.clamp(min_y, max_y);
            v.y = 0.0;
        }
        *node = NodePosition {
            x,
            y,
            vx: v.x,
            vy: v.y,
            ..*node
        };
    }
}

/// Unit direction from `b` to `a` and their distance. Coincident points use
/// a unit distance along +x so the pair still separates.
fn separation(a: Pos2, b: Pos2) -> (Vec2, f32) {
    let delta = a - b;
    let dist = delta.length();
    if dist > 0.0 && dist.is_finite() {
        (delta / dist, dist)
    } else {
        (Vec2::X, 1.0)
    }
}
