use std::collections::{HashMap, HashSet};

use crate::ui::theme;
use chrono::NaiveDate;
use egui::epaint::CubicBezierShape;
use egui::{Align2, Color32, Painter, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};
use gantt_engine::config::EngineConfig;
use gantt_engine::layout::{
    bar_rect, gantt_geometry, path_hit, route_dependencies, DependencyPath, Focus, PathShape,
    PathStyle, RowMetrics, Timeline,
};
use gantt_engine::{Dependency, Schedule, Task};
use uuid::Uuid;

/// Pointer tolerance for picking a dependency line.
const LINK_HIT_PX: f32 = 5.0;

/// Result details from interactions in the Gantt chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// A click landed on the canvas; `Some` inner value when it hit a line.
    pub clicked: Option<Option<Uuid>>,
    /// Ctrl+scroll direction: positive zooms in.
    pub zoom_steps: i32,
}

pub struct GanttInput<'a> {
    pub tasks: &'a [Task],
    pub dependencies: &'a [Dependency],
    /// Placement for undated bars; absent while the graph has a cycle.
    pub schedule: Option<&'a Schedule>,
    pub timeline: &'a Timeline,
    pub today: NaiveDate,
    pub config: &'a EngineConfig,
    pub focus: Focus,
    /// Tasks with at least one violated incoming link.
    pub conflicted: &'a HashSet<Uuid>,
}

/// Render the Gantt chart area.
pub fn show_gantt_chart(input: &GanttInput<'_>, ui: &mut Ui) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let metrics = RowMetrics::default();
    let timeline = input.timeline;
    let available = ui.available_size();
    let chart_width = timeline.total_width().max(available.x);
    let chart_height = metrics.row_top(input.tasks.len()) + 40.0;

    // Handle zoom with scroll wheel
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            interaction.zoom_steps = 1;
        } else if scroll_delta.y < 0.0 {
            interaction.zoom_steps = -1;
        }
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            draw_columns(&painter, origin, input, &metrics, response.rect.height());
            draw_rows(&painter, origin, input.tasks.len(), chart_width, &metrics);

            let geometry = gantt_geometry(
                input.tasks,
                input.schedule,
                timeline,
                input.today,
                input.config,
            );
            let rects: Vec<Rect> = geometry
                .iter()
                .enumerate()
                .map(|(row, g)| bar_rect(g, row, &metrics).translate(origin.to_vec2()))
                .collect();

            let pointer = response.hover_pos();
            let hovered = pointer.and_then(|p| {
                rects
                    .iter()
                    .position(|r| r.contains(p))
                    .map(|row| input.tasks[row].id)
            });

            let focus = Focus {
                hovered_task: hovered.or(input.focus.hovered_task),
                selected_dependency: input.focus.selected_dependency,
            };
            let by_id: HashMap<Uuid, Rect> = input
                .tasks
                .iter()
                .zip(&rects)
                .map(|(t, r)| (t.id, *r))
                .collect();
            let paths = route_dependencies(
                input.dependencies,
                &by_id,
                PathStyle::Orthogonal,
                focus,
                &input.config.routing,
            );

            for (row, ((task, g), rect)) in input.tasks.iter().zip(&geometry).zip(&rects).enumerate() {
                let conflicted = input.conflicted.contains(&task.id);
                draw_task_bar(&painter, task, *rect, g.placeholder, row, conflicted);
            }

            // Idle lines under highlighted ones.
            for path in paths.iter().filter(|p| !p.highlighted) {
                paint_path(&painter, path, &input.config.routing, focus);
            }
            for path in paths.iter().filter(|p| p.highlighted) {
                paint_path(&painter, path, &input.config.routing, focus);
            }

            draw_timeline_header(&painter, origin, input, chart_width, &metrics);
            if let Some(x) = timeline.today_x(input.today) {
                let x = origin.x + x;
                painter.line_segment(
                    [
                        Pos2::new(x, origin.y + metrics.header_height),
                        Pos2::new(x, response.rect.bottom()),
                    ],
                    Stroke::new(1.5, theme::TODAY_LINE),
                );
            }

            if let Some(task_id) = hovered {
                if let Some(task) = input.tasks.iter().find(|t| t.id == task_id) {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("task-tip", task.id)),
                        |ui| task_tooltip(ui, task, input.conflicted.contains(&task.id)),
                    );
                }
            }

            if response.clicked() {
                let hit = response.interact_pointer_pos().and_then(|p| {
                    paths
                        .iter()
                        .find(|path| path_hit(path, p, LINK_HIT_PX))
                        .map(|path| path.dependency_id)
                });
                interaction.clicked = Some(hit);
            }
        });

    interaction
}

fn task_tooltip(ui: &mut Ui, task: &Task, conflicted: bool) {
    ui.strong(&task.title);
    match task.dates() {
        Some(iv) => {
            ui.label(format!(
                "{} → {} ({} days)",
                iv.start.format("%d/%m/%Y"),
                iv.end.format("%d/%m/%Y"),
                iv.duration_days()
            ));
        }
        None => {
            ui.label(egui::RichText::new("No dates set").italics().color(theme::TEXT_DIM));
        }
    }
    ui.label(format!("Progress: {}%", task.progress));
    if conflicted {
        ui.colored_label(theme::CONFLICT, "Dependency conflict");
    }
}

/// Weekend shading and vertical grid lines at header boundaries.
fn draw_columns(
    painter: &Painter,
    origin: Pos2,
    input: &GanttInput<'_>,
    metrics: &RowMetrics,
    height: f32,
) {
    let timeline = input.timeline;
    let top = origin.y + metrics.header_height;
    let bottom = origin.y + height;

    if timeline.day_width >= theme::MIN_WEEKEND_WIDTH {
        for column in timeline.columns(input.today).filter(|c| c.is_weekend) {
            let x = origin.x + timeline.date_to_x(column.date);
            painter.rect_filled(
                Rect::from_min_max(Pos2::new(x, top), Pos2::new(x + timeline.day_width, bottom)),
                0.0,
                theme::BG_WEEKEND,
            );
        }
    }

    for cell in timeline.header(input.today) {
        let x = origin.x + cell.left_px;
        painter.line_segment(
            [Pos2::new(x, top), Pos2::new(x, bottom)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
}

fn draw_rows(painter: &Painter, origin: Pos2, rows: usize, width: f32, metrics: &RowMetrics) {
    let pitch = metrics.row_height + metrics.row_gap;
    for i in 0..rows {
        let y = origin.y + metrics.header_height + i as f32 * pitch;
        if i % 2 == 0 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, pitch)),
                0.0,
                theme::BG_ROW_STRIPE,
            );
        }
        painter.line_segment(
            [Pos2::new(origin.x, y + pitch), Pos2::new(origin.x + width, y + pitch)],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_timeline_header(
    painter: &Painter,
    origin: Pos2,
    input: &GanttInput<'_>,
    width: f32,
    metrics: &RowMetrics,
) {
    let timeline = input.timeline;
    let header_rect = Rect::from_min_size(origin, Vec2::new(width, metrics.header_height));
    painter.rect_filled(header_rect, 0.0, theme::BG_HEADER);

    let half = metrics.header_height / 2.0;
    for cell in timeline.header(input.today) {
        let x = origin.x + cell.left_px;
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + half)],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
        if cell.width_px > 24.0 {
            painter.text(
                Pos2::new(x + 4.0, origin.y + half / 2.0),
                Align2::LEFT_CENTER,
                &cell.label,
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
    }

    // Day numbers on the lower row when they fit.
    if timeline.day_width >= 16.0 {
        for column in timeline.columns(input.today) {
            let x = origin.x + timeline.date_to_x(column.date);
            let color = if column.is_today {
                theme::TODAY_LINE
            } else if column.is_weekend {
                theme::TEXT_DIM
            } else {
                theme::TEXT_SECONDARY
            };
            painter.text(
                Pos2::new(x + timeline.day_width / 2.0, origin.y + half * 1.5),
                Align2::CENTER_CENTER,
                column.date.format("%d").to_string(),
                theme::font_sub(),
                color,
            );
        }
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + metrics.header_height),
            Pos2::new(origin.x + width, origin.y + metrics.header_height),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_task_bar(
    painter: &Painter,
    task: &Task,
    rect: Rect,
    placeholder: bool,
    row: usize,
    conflicted: bool,
) {
    let mut color = theme::task_color(row);
    if placeholder {
        color = color.gamma_multiply(theme::PLACEHOLDER_OPACITY);
    }
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    painter.rect_filled(rect, rounding, color);

    if !placeholder && task.progress > 0 && task.progress < 100 {
        let done = rect.width() * f32::from(task.progress) / 100.0;
        let rest = Rect::from_min_max(Pos2::new(rect.left() + done, rect.top()), rect.max);
        painter.rect_filled(rest, rounding, theme::PROGRESS_OVERLAY);
    }

    if placeholder {
        painter.rect_stroke(rect, rounding, Stroke::new(1.0, color.gamma_multiply(2.0)));
    }
    if conflicted {
        painter.rect_stroke(rect.expand(1.5), rounding, Stroke::new(1.5, theme::CONFLICT));
    }

    let galley = painter.layout_no_wrap(task.title.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
    let text_width = galley.size().x;
    if text_width + 12.0 < rect.width() {
        painter.text(
            Pos2::new(rect.left() + 6.0, rect.center().y),
            Align2::LEFT_CENTER,
            &task.title,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
    } else {
        painter.text(
            Pos2::new(rect.right() + 6.0, rect.center().y),
            Align2::LEFT_CENTER,
            &task.title,
            theme::font_bar(),
            theme::TEXT_SECONDARY,
        );
    }
}

/// Paint one routed dependency: line, arrowhead, anchor markers and label.
pub(crate) fn paint_path(
    painter: &Painter,
    path: &DependencyPath,
    config: &gantt_engine::config::RoutingConfig,
    focus: Focus,
) {
    let selected = focus.selected_dependency == Some(path.dependency_id);
    let color = if path.highlighted || selected {
        theme::LINK_HIGHLIGHT
    } else {
        theme::LINK_IDLE
    };
    let stroke = Stroke::new(if selected { 2.5 } else { 1.5 }, color);

    match &path.shape {
        PathShape::Polyline(points) => {
            painter.add(Shape::line(points.clone(), stroke));
        }
        PathShape::Cubic(points) => {
            painter.add(CubicBezierShape::from_points_stroke(
                *points,
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }
    }
    painter.add(Shape::convex_polygon(
        path.arrow.points().to_vec(),
        color,
        Stroke::NONE,
    ));
    for marker in path.markers {
        painter.circle_filled(marker, config.marker_radius, color);
    }

    if let Some(label) = path.label {
        let rect = Rect::from_center_size(path.midpoint, Vec2::new(22.0, 14.0));
        painter.rect_filled(rect, Rounding::same(3.0), theme::BG_HEADER);
        painter.text(
            path.midpoint,
            Align2::CENTER_CENTER,
            label,
            theme::font_small(),
            color,
        );
    }
}
