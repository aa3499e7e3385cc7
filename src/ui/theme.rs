//! Colours, sizes and fonts shared by the viewer panels.

use egui::style::WidgetVisuals;
use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Surfaces ─────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(22, 24, 31);
pub const BG_PANEL: Color32 = Color32::from_rgb(29, 31, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(36, 39, 50);
pub const BG_ROW_STRIPE: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 5);
pub const BG_WEEKEND: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 40);
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(52, 55, 68);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 47, 59);

// ── Text ─────────────────────────────────────────────────────────────────────

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(228, 231, 239);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(152, 158, 176);
pub const TEXT_DIM: Color32 = Color32::from_rgb(98, 104, 120);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;

// ── Schedule semantics ───────────────────────────────────────────────────────

pub const ACCENT: Color32 = Color32::from_rgb(86, 144, 222);
pub const TODAY_LINE: Color32 = Color32::from_rgb(236, 80, 80);
/// Outline of a task whose dates break one of its links.
pub const CONFLICT: Color32 = Color32::from_rgb(240, 110, 60);
pub const LINK_IDLE: Color32 = Color32::from_rgb(118, 125, 146);
pub const LINK_HIGHLIGHT: Color32 = Color32::from_rgb(255, 193, 7);
/// Darkens the unfinished part of a bar.
pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 55);
/// Opacity multiplier for bars whose dates are inferred.
pub const PLACEHOLDER_OPACITY: f32 = 0.35;

pub const BAR_ROUNDING: f32 = 5.0;
pub const NODE_RADIUS: f32 = 18.0;
pub const SIDE_PANEL_WIDTH: f32 = 300.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;
/// Below this many pixels per day weekend shading is skipped.
pub const MIN_WEEKEND_WIDTH: f32 = 4.0;

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

const TASK_COLORS: [Color32; 8] = [
    Color32::from_rgb(66, 133, 244),
    Color32::from_rgb(52, 168, 83),
    Color32::from_rgb(171, 71, 188),
    Color32::from_rgb(251, 140, 0),
    Color32::from_rgb(3, 169, 244),
    Color32::from_rgb(0, 150, 136),
    Color32::from_rgb(0, 188, 212),
    Color32::from_rgb(121, 134, 203),
];

/// Bar and node fill for a row, cycling through the palette.
pub fn task_color(row: usize) -> Color32 {
    TASK_COLORS[row % TASK_COLORS.len()]
}

fn widget(visuals: &mut WidgetVisuals, bg: Color32, border: Color32, fg: Stroke) {
    visuals.bg_fill = bg;
    visuals.weak_bg_fill = bg;
    visuals.bg_stroke = Stroke::new(1.0, border);
    visuals.fg_stroke = fg;
    visuals.rounding = Rounding::same(4.0);
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_DARK;
    visuals.striped = false;

    let w = &mut visuals.widgets;
    widget(&mut w.noninteractive, BG_PANEL, BORDER_SUBTLE, Stroke::new(1.0, TEXT_SECONDARY));
    widget(&mut w.inactive, Color32::from_rgb(42, 45, 57), BORDER_SUBTLE, Stroke::new(1.0, TEXT_PRIMARY));
    widget(&mut w.hovered, Color32::from_rgb(52, 55, 69), ACCENT, Stroke::new(1.0, TEXT_PRIMARY));
    widget(&mut w.active, Color32::from_rgb(60, 63, 77), ACCENT, Stroke::new(2.0, Color32::WHITE));
    widget(&mut w.open, Color32::from_rgb(50, 53, 67), ACCENT, Stroke::new(1.0, TEXT_PRIMARY));

    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}
