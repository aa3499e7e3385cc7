use crate::app::GanttApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};
use gantt_engine::{resolve, ResolveStrategy};

const DIALOG_WIDTH: f32 = 320.0;

/// Render the "Set Dates" dialog for manually resolving one task.
pub fn show_manual_dates_dialog(app: &mut GanttApp, ctx: &Context) {
    let Some(edit) = app.manual_edit.as_mut() else {
        return;
    };
    let mut apply = false;
    let mut should_close = false;

    // Preview against every link with the dates currently picked.
    let preview = (edit.end >= edit.start).then(|| {
        resolve(
            &app.project.tasks,
            &app.project.dependencies,
            edit.task_id,
            ResolveStrategy::Manual {
                start: edit.start,
                end: edit.end,
            },
            app.today,
            &app.config,
        )
    });

    Window::new(RichText::new("Set Dates").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(RichText::new(&edit.title).font(theme::font_header()));
            ui.add_space(4.0);

            egui::Grid::new("manual_dates_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut edit.start).id_salt("manual_dp_start"));
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut edit.end).id_salt("manual_dp_end"));
                    ui.end_row();
                });

            ui.add_space(6.0);
            match &preview {
                None => {
                    ui.colored_label(theme::CONFLICT, "End date is before start date");
                }
                Some(Err(e)) => {
                    ui.colored_label(theme::CONFLICT, e.to_string());
                }
                Some(Ok(updated)) if updated.is_clean() => {
                    ui.label(RichText::new("All links satisfied").color(theme::TEXT_SECONDARY));
                }
                Some(Ok(updated)) => {
                    ui.colored_label(
                        theme::CONFLICT,
                        format!("{} link(s) would stay violated", updated.violations.len()),
                    );
                    for v in &updated.violations {
                        ui.label(
                            RichText::new(&v.message)
                                .font(theme::font_small())
                                .color(theme::TEXT_DIM),
                        );
                    }
                }
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let can_apply = matches!(preview, Some(Ok(_)));
                let apply_btn = egui::Button::new(RichText::new("Apply").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_enabled(can_apply, apply_btn).clicked() {
                    apply = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        should_close = true;
    }
    if apply {
        if let Some(Ok(updated)) = preview {
            app.apply_update(updated);
        }
        should_close = true;
    }
    if should_close {
        app.manual_edit = None;
    }
}
