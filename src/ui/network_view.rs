use std::collections::{HashMap, HashSet};

use crate::ui::gantt_chart::paint_path;
use crate::ui::theme;
use egui::{Align2, Pos2, Sense, Stroke, Ui, Vec2};
use gantt_engine::config::EngineConfig;
use gantt_engine::layout::{route_dependencies, Focus, NodePosition, PathStyle};
use gantt_engine::{Dependency, Task};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct NetworkInteraction {
    pub clicked_task: Option<Uuid>,
}

/// Render the dependency graph with the precomputed force layout.
pub fn show_network(
    tasks: &[Task],
    dependencies: &[Dependency],
    positions: &[NodePosition],
    conflicted: &HashSet<Uuid>,
    focus: Focus,
    config: &EngineConfig,
    ui: &mut Ui,
) -> NetworkInteraction {
    let mut interaction = NetworkInteraction::default();
    let canvas = Vec2::new(config.force.width, config.force.height);
    let size = canvas.max(ui.available_size());
    let (response, painter) = ui.allocate_painter(size, Sense::click());
    painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

    // Centre the simulation canvas inside the panel.
    let origin = (response.rect.center() - canvas / 2.0).to_vec2();
    let centres: Vec<(Uuid, Pos2)> = positions
        .iter()
        .map(|p| (p.task_id, p.pos() + origin))
        .collect();

    let hovered = response.hover_pos().and_then(|pointer| {
        centres
            .iter()
            .find(|(_, c)| c.distance(pointer) <= theme::NODE_RADIUS)
            .map(|(id, _)| *id)
    });
    let focus = Focus {
        hovered_task: hovered.or(focus.hovered_task),
        ..focus
    };

    let rects: HashMap<Uuid, egui::Rect> = positions
        .iter()
        .map(|p| {
            (
                p.task_id,
                p.rect(theme::NODE_RADIUS).translate(origin),
            )
        })
        .collect();
    let paths = route_dependencies(
        dependencies,
        &rects,
        PathStyle::Curved,
        focus,
        &config.routing,
    );
    for path in &paths {
        paint_path(&painter, path, &config.routing, focus);
    }

    let titles: HashMap<Uuid, &str> = tasks.iter().map(|t| (t.id, t.title.as_str())).collect();
    for (row, (task_id, centre)) in centres.iter().enumerate() {
        let mut fill = theme::task_color(row);
        if tasks.iter().any(|t| t.id == *task_id && !t.is_dated()) {
            fill = fill.gamma_multiply(theme::PLACEHOLDER_OPACITY);
        }
        painter.circle_filled(*centre, theme::NODE_RADIUS, fill);
        let ring = if conflicted.contains(task_id) {
            Stroke::new(2.0, theme::CONFLICT)
        } else if hovered == Some(*task_id) {
            Stroke::new(2.0, theme::LINK_HIGHLIGHT)
        } else {
            Stroke::new(1.0, theme::BORDER_SUBTLE)
        };
        painter.circle_stroke(*centre, theme::NODE_RADIUS, ring);
        if let Some(title) = titles.get(task_id) {
            painter.text(
                *centre + Vec2::new(0.0, theme::NODE_RADIUS + 8.0),
                Align2::CENTER_CENTER,
                *title,
                theme::font_small(),
                theme::TEXT_SECONDARY,
            );
        }
    }

    if tasks.is_empty() {
        painter.text(
            response.rect.center(),
            Align2::CENTER_CENTER,
            "No tasks",
            theme::font_header(),
            theme::TEXT_DIM,
        );
    }

    if response.clicked() {
        interaction.clicked_task = hovered;
    }
    interaction
}
