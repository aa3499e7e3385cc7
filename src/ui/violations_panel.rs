use crate::ui::theme;
use egui::{RichText, Ui};
use gantt_engine::{CycleError, Schedule, Task};
use uuid::Uuid;

/// Action requested from the violations panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    AutoFix(Uuid),
    EditDates(Uuid),
    FixAll,
    Hover(Uuid),
}

/// Render the conflict list for the current schedule.
pub fn show_violations_panel(
    tasks: &[Task],
    schedule: Result<&Schedule, &CycleError>,
    ui: &mut Ui,
) -> PanelAction {
    let mut action = PanelAction::None;
    let title = |id: Uuid| {
        tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.as_str())
            .unwrap_or("?")
    };

    ui.add_space(4.0);
    ui.label(RichText::new("Conflicts").font(theme::font_header()).strong());
    ui.separator();

    let schedule = match schedule {
        Ok(schedule) => schedule,
        Err(cycle) => {
            ui.colored_label(
                theme::CONFLICT,
                format!("{} Circular dependency", egui_phosphor::regular::WARNING),
            );
            for id in &cycle.task_ids {
                ui.label(RichText::new(format!("• {}", title(*id))).font(theme::font_sub()));
            }
            ui.add_space(6.0);
            ui.label(
                RichText::new("Remove one of the links above to schedule the project.")
                    .font(theme::font_small())
                    .color(theme::TEXT_DIM),
            );
            return action;
        }
    };

    if schedule.violations.is_empty() {
        ui.label(
            RichText::new(format!("{} No conflicts", egui_phosphor::regular::CHECK_CIRCLE))
                .color(theme::TEXT_SECONDARY),
        );
    } else {
        let label = format!(
            "{} Fix all ({})",
            egui_phosphor::regular::MAGIC_WAND,
            schedule.violations.len()
        );
        if ui.button(label).clicked() {
            action = PanelAction::FixAll;
        }
        ui.add_space(4.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(ui.available_height() * 0.7)
            .show(ui, |ui| {
                for v in &schedule.violations {
                    let frame = egui::Frame::group(ui.style());
                    let response = frame
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(title(v.task_id)).strong());
                                ui.label(
                                    RichText::new(v.kind.code())
                                        .font(theme::font_small())
                                        .color(theme::TEXT_DIM),
                                );
                            });
                            ui.label(
                                RichText::new(&v.message)
                                    .font(theme::font_sub())
                                    .color(theme::TEXT_SECONDARY),
                            );
                            ui.label(
                                RichText::new(format!(
                                    "{} → {}  ⇒  {} → {}",
                                    v.current_start.format("%d/%m"),
                                    v.current_end.format("%d/%m"),
                                    v.required_start.format("%d/%m"),
                                    v.required_end.format("%d/%m"),
                                ))
                                .font(theme::font_small()),
                            );
                            ui.horizontal(|ui| {
                                let fix = format!("{} Auto-fix", egui_phosphor::regular::MAGIC_WAND);
                                if ui.small_button(fix).clicked() {
                                    action = PanelAction::AutoFix(v.task_id);
                                }
                                let edit = format!("{} Set dates…", egui_phosphor::regular::CALENDAR);
                                if ui.small_button(edit).clicked() {
                                    action = PanelAction::EditDates(v.task_id);
                                }
                            });
                        })
                        .response;
                    if action == PanelAction::None && response.hovered() {
                        action = PanelAction::Hover(v.task_id);
                    }
                }
            });
    }

    if !schedule.link_errors.is_empty() {
        ui.add_space(8.0);
        ui.label(RichText::new("Skipped links").font(theme::font_sub()).strong());
        for err in &schedule.link_errors {
            ui.label(
                RichText::new(err.to_string())
                    .font(theme::font_small())
                    .color(theme::TEXT_DIM),
            );
        }
    }

    action
}
