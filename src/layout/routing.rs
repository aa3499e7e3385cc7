//! Dependency line routing between two bar (or node) rectangles.
//!
//! The line always runs from the predecessor to the successor. Which edge of
//! each rectangle it touches follows the dependency kind, so an FS line
//! leaves the predecessor's finish and enters the successor's start.

use std::collections::HashMap;

use egui::{pos2, vec2, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RoutingConfig;
use crate::model::{Dependency, DependencyKind};

/// Edge of a bar a dependency line attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorSide {
    Start,
    Finish,
}

impl AnchorSide {
    fn x(self, rect: &Rect) -> f32 {
        match self {
            AnchorSide::Start => rect.left(),
            AnchorSide::Finish => rect.right(),
        }
    }

    /// Horizontal direction of a line leaving this side.
    fn outward(self) -> f32 {
        match self {
            AnchorSide::Start => -1.0,
            AnchorSide::Finish => 1.0,
        }
    }
}

/// Anchor sides on the predecessor (`source`) and successor (`target`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    pub source: AnchorSide,
    pub target: AnchorSide,
}

pub fn anchor_points(kind: DependencyKind) -> Anchors {
    use AnchorSide::{Finish, Start};
    let (source, target) = match kind {
        DependencyKind::FinishToStart => (Finish, Start),
        DependencyKind::StartToStart => (Start, Start),
        DependencyKind::FinishToFinish => (Finish, Finish),
        DependencyKind::StartToFinish => (Start, Finish),
    };
    Anchors { source, target }
}

/// Orthogonal dog-legs for the timeline, curves for the network view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStyle {
    #[default]
    Orthogonal,
    Curved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathShape {
    Polyline(Vec<Pos2>),
    /// Cubic bezier: start, control 1, control 2, end.
    Cubic([Pos2; 4]),
}

const CURVE_SEGMENTS: usize = 16;

impl PathShape {
    pub fn start(&self) -> Pos2 {
        match self {
            PathShape::Polyline(points) => points.first().copied().unwrap_or(Pos2::ZERO),
            PathShape::Cubic(p) => p[0],
        }
    }

    pub fn end(&self) -> Pos2 {
        match self {
            PathShape::Polyline(points) => points.last().copied().unwrap_or(Pos2::ZERO),
            PathShape::Cubic(p) => p[3],
        }
    }

    /// Direction of travel at the end of the path (unit length).
    pub fn end_tangent(&self) -> Vec2 {
        let raw = match self {
            PathShape::Polyline(points) => match points.as_slice() {
                [.., a, b] => *b - *a,
                _ => Vec2::ZERO,
            },
            PathShape::Cubic([p0, _, c2, p3]) => {
                let t = *p3 - *c2;
                if t.length_sq() > 0.0 {
                    t
                } else {
                    *p3 - *p0
                }
            }
        };
        if raw.length_sq() > 0.0 {
            raw.normalized()
        } else {
            Vec2::X
        }
    }

    /// The path as a polyline; curves are sampled uniformly in `t`.
    pub fn flatten(&self) -> Vec<Pos2> {
        match self {
            PathShape::Polyline(points) => points.clone(),
            PathShape::Cubic(p) => (0..=CURVE_SEGMENTS)
                .map(|i| cubic_point(p, i as f32 / CURVE_SEGMENTS as f32))
                .collect(),
        }
    }

    /// Point halfway along the path.
    pub fn midpoint(&self) -> Pos2 {
        match self {
            PathShape::Cubic(p) => cubic_point(p, 0.5),
            PathShape::Polyline(points) => polyline_midpoint(points),
        }
    }
}

fn cubic_point(p: &[Pos2; 4], t: f32) -> Pos2 {
    let u = 1.0 - t;
    let w = [u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t];
    pos2(
        w[0] * p[0].x + w[1] * p[1].x + w[2] * p[2].x + w[3] * p[3].x,
        w[0] * p[0].y + w[1] * p[1].y + w[2] * p[2].y + w[3] * p[3].y,
    )
}

fn polyline_midpoint(points: &[Pos2]) -> Pos2 {
    let total: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    let mut remaining = total / 2.0;
    for w in points.windows(2) {
        let len = w[0].distance(w[1]);
        if len > 0.0 && remaining <= len {
            return w[0] + (w[1] - w[0]) * (remaining / len);
        }
        remaining -= len;
    }
    points.first().copied().unwrap_or(Pos2::ZERO)
}

/// Triangle at the end of a path, pointing along its final tangent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    pub tip: Pos2,
    pub left: Pos2,
    pub right: Pos2,
}

impl Arrowhead {
    fn at(tip: Pos2, direction: Vec2, size: f32) -> Self {
        let back = tip - direction * size;
        let perp = vec2(-direction.y, direction.x) * (size * 0.5);
        Self {
            tip,
            left: back + perp,
            right: back - perp,
        }
    }

    pub fn points(&self) -> [Pos2; 3] {
        [self.tip, self.left, self.right]
    }
}

/// Drawable geometry of one route, independent of any dependency record.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    pub shape: PathShape,
    pub arrow: Arrowhead,
    /// Anchor circles at the source and target ends.
    pub markers: [Pos2; 2],
    pub midpoint: Pos2,
}

/// Connect `source` to `target` at the given sides.
pub fn route_path(
    source: Rect,
    target: Rect,
    anchors: Anchors,
    style: PathStyle,
    config: &RoutingConfig,
) -> RoutedPath {
    let p0 = pos2(anchors.source.x(&source), source.center().y);
    let pn = pos2(anchors.target.x(&target), target.center().y);
    let out = anchors.source.outward();
    // A line entering the start edge travels rightwards, the finish edge leftwards.
    let inward = -anchors.target.outward();

    let shape = match style {
        PathStyle::Orthogonal => {
            PathShape::Polyline(orthogonal(p0, pn, out, inward, &source, &target, config))
        }
        PathStyle::Curved => {
            let offset = ((pn.x - p0.x).abs() * config.curve_factor)
                .max(config.stub_px)
                .min(config.max_curve_offset);
            PathShape::Cubic([
                p0,
                p0 + vec2(out * offset, 0.0),
                pn - vec2(inward * offset, 0.0),
                pn,
            ])
        }
    };

    RoutedPath {
        arrow: Arrowhead::at(pn, shape.end_tangent(), config.arrow_size),
        markers: [p0, pn],
        midpoint: shape.midpoint(),
        shape,
    }
}

fn orthogonal(
    p0: Pos2,
    pn: Pos2,
    out: f32,
    inward: f32,
    source: &Rect,
    target: &Rect,
    config: &RoutingConfig,
) -> Vec<Pos2> {
    let stub = config.stub_px;
    let p1 = p0 + vec2(out * stub, 0.0);
    let approach = pn - vec2(inward * stub, 0.0);

    let forward = if inward > 0.0 {
        p1.x <= approach.x
    } else {
        p1.x >= approach.x
    };

    let mut points = if forward {
        vec![p0, p1, pos2(p1.x, pn.y), pn]
    } else {
        // Detour through the gap between the two rows so the line never
        // crosses either bar.
        let lane = if source.center().y < target.center().y {
            (source.bottom() + target.top()) / 2.0
        } else if source.center().y > target.center().y {
            (source.top() + target.bottom()) / 2.0
        } else {
            source.bottom().max(target.bottom()) + stub / 2.0
        };
        vec![
            p0,
            p1,
            pos2(p1.x, lane),
            pos2(approach.x, lane),
            approach,
            pn,
        ]
    };
    points.dedup_by(|a, b| a.distance_sq(*b) < 1e-6);
    points
}

/// A routed dependency ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyPath {
    pub dependency_id: Uuid,
    pub kind: DependencyKind,
    pub shape: PathShape,
    pub arrow: Arrowhead,
    pub markers: [Pos2; 2],
    pub midpoint: Pos2,
    /// Type code shown at the midpoint while hovered or selected.
    pub label: Option<&'static str>,
    pub highlighted: bool,
}

/// An edge highlights iff the hovered task is one of its endpoints.
pub fn is_highlighted(hovered: Option<Uuid>, dependency: &Dependency) -> bool {
    hovered.is_some_and(|id| dependency.touches(id))
}

/// Interaction state that decorates routed paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Focus {
    pub hovered_task: Option<Uuid>,
    pub selected_dependency: Option<Uuid>,
}

pub fn route_dependency(
    dependency: &Dependency,
    predecessor: Rect,
    successor: Rect,
    style: PathStyle,
    focus: Focus,
    config: &RoutingConfig,
) -> DependencyPath {
    let routed = route_path(
        predecessor,
        successor,
        anchor_points(dependency.kind),
        style,
        config,
    );
    let highlighted = is_highlighted(focus.hovered_task, dependency);
    let selected = focus.selected_dependency == Some(dependency.id);
    DependencyPath {
        dependency_id: dependency.id,
        kind: dependency.kind,
        shape: routed.shape,
        arrow: routed.arrow,
        markers: routed.markers,
        midpoint: routed.midpoint,
        label: (highlighted || selected).then(|| dependency.kind.code()),
        highlighted,
    }
}

/// Route every dependency whose two endpoints have a rectangle.
pub fn route_dependencies(
    dependencies: &[Dependency],
    rects: &HashMap<Uuid, Rect>,
    style: PathStyle,
    focus: Focus,
    config: &RoutingConfig,
) -> Vec<DependencyPath> {
    dependencies
        .iter()
        .filter_map(|dep| {
            let pred = rects.get(&dep.to_task_id)?;
            let succ = rects.get(&dep.from_task_id)?;
            (dep.from_task_id != dep.to_task_id)
                .then(|| route_dependency(dep, *pred, *succ, style, focus, config))
        })
        .collect()
}

/// Distance from `point` to the path is at most `tolerance`.
pub fn path_hit(path: &DependencyPath, point: Pos2, tolerance: f32) -> bool {
    let points = path.shape.flatten();
    points
        .windows(2)
        .any(|w| segment_distance(point, w[0], w[1]) <= tolerance)
}

fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(left: f32, top: f32, width: f32) -> Rect {
        Rect::from_min_size(pos2(left, top), vec2(width, 20.0))
    }

    fn cfg() -> RoutingConfig {
        RoutingConfig::default()
    }

    #[test]
    fn anchors_match_constraint_semantics() {
        use AnchorSide::*;
        let pairs: Vec<_> = DependencyKind::ALL
            .iter()
            .map(|k| {
                let a = anchor_points(*k);
                (a.source, a.target)
            })
            .collect();
        assert_eq!(
            pairs,
            vec![(Finish, Start), (Start, Start), (Finish, Finish), (Start, Finish)]
        );
    }

    #[test]
    fn forward_fs_is_a_dog_leg() {
        let pred = bar(0.0, 0.0, 100.0);
        let succ = bar(200.0, 40.0, 50.0);
        let path = route_path(
            pred,
            succ,
            anchor_points(DependencyKind::FinishToStart),
            PathStyle::Orthogonal,
            &cfg(),
        );
        let PathShape::Polyline(points) = &path.shape else {
            panic!("expected polyline");
        };
        assert_eq!(
            points,
            &vec![pos2(100.0, 10.0), pos2(112.0, 10.0), pos2(112.0, 50.0), pos2(200.0, 50.0)]
        );
        assert_eq!(path.markers, [pos2(100.0, 10.0), pos2(200.0, 50.0)]);
        // Arrow points right, into the successor's start edge.
        assert_eq!(path.arrow.tip, pos2(200.0, 50.0));
        assert!(path.arrow.left.x < 200.0 && path.arrow.right.x < 200.0);
        // Every segment is axis aligned.
        for w in points.windows(2) {
            assert!(w[0].x == w[1].x || w[0].y == w[1].y);
        }
    }

    #[test]
    fn backward_fs_detours_between_rows() {
        let pred = bar(100.0, 0.0, 100.0);
        let succ = bar(50.0, 40.0, 50.0);
        let path = route_path(
            pred,
            succ,
            anchor_points(DependencyKind::FinishToStart),
            PathStyle::Orthogonal,
            &cfg(),
        );
        let PathShape::Polyline(points) = &path.shape else {
            panic!("expected polyline");
        };
        assert_eq!(points.len(), 6);
        assert_eq!(points[2].y, 30.0);
        assert_eq!(points[4], pos2(38.0, 50.0));
        assert_eq!(path.shape.end_tangent(), Vec2::X);
    }

    #[test]
    fn finish_target_is_entered_from_the_right() {
        let pred = bar(0.0, 0.0, 100.0);
        let succ = bar(20.0, 40.0, 50.0);
        let path = route_path(
            pred,
            succ,
            anchor_points(DependencyKind::FinishToFinish),
            PathStyle::Orthogonal,
            &cfg(),
        );
        assert_eq!(path.shape.end(), pos2(70.0, 50.0));
        assert_eq!(path.shape.end_tangent(), -Vec2::X);
        assert!(path.arrow.left.x > 70.0);
    }

    #[test]
    fn curve_offset_is_clamped() {
        let pred = bar(0.0, 0.0, 10.0);
        let succ = bar(1000.0, 100.0, 10.0);
        let path = route_path(
            pred,
            succ,
            anchor_points(DependencyKind::FinishToStart),
            PathStyle::Curved,
            &cfg(),
        );
        let PathShape::Cubic(p) = path.shape else {
            panic!("expected curve");
        };
        assert_eq!(p[1].x - p[0].x, cfg().max_curve_offset);
        assert_eq!(p[3].x - p[2].x, cfg().max_curve_offset);
        assert_eq!(path.midpoint, pos2(505.0, 60.0));
    }

    #[test]
    fn highlight_is_a_pure_predicate() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let dep = Dependency::new(b, a, DependencyKind::FinishToStart);
        assert!(is_highlighted(Some(a), &dep));
        assert!(is_highlighted(Some(b), &dep));
        assert!(!is_highlighted(Some(Uuid::from_u128(3)), &dep));
        assert!(!is_highlighted(None, &dep));
    }

    #[test]
    fn label_only_when_focused() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let dep = Dependency::new(b, a, DependencyKind::StartToStart);
        let rects = HashMap::from([(a, bar(0.0, 0.0, 50.0)), (b, bar(80.0, 40.0, 50.0))]);
        let quiet = route_dependencies(&[dep.clone()], &rects, PathStyle::Orthogonal, Focus::default(), &cfg());
        assert_eq!(quiet[0].label, None);
        let focus = Focus {
            hovered_task: Some(b),
            selected_dependency: None,
        };
        let loud = route_dependencies(&[dep.clone()], &rects, PathStyle::Orthogonal, focus, &cfg());
        assert_eq!(loud[0].label, Some("SS"));
        assert!(loud[0].highlighted);
        assert!(path_hit(&loud[0], loud[0].midpoint, 1.0));
        assert!(!path_hit(&loud[0], pos2(500.0, 500.0), 4.0));
    }

    #[test]
    fn edges_without_rects_are_skipped() {
        let a = Uuid::from_u128(1);
        let dep = Dependency::new(Uuid::from_u128(2), a, DependencyKind::FinishToStart);
        let rects = HashMap::from([(a, bar(0.0, 0.0, 50.0))]);
        assert!(route_dependencies(&[dep], &rects, PathStyle::Curved, Focus::default(), &cfg())
            .is_empty());
    }
}
