use crate::app::{GanttApp, ViewMode};
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use gantt_engine::layout::Granularity;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_header()), |ui| {
            if ui.button("  Open...").clicked() {
                app.open_project();
                ui.close_menu();
            }
            if ui.button("  Load Sample").clicked() {
                app.load_sample();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export Schedule CSV...").clicked() {
                app.export_schedule();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_header()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.zoom_out();
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Timeline Scale").small().weak());
            for granularity in Granularity::ALL {
                let selected = app.timeline.granularity == granularity;
                if ui.radio(selected, granularity.label()).clicked() {
                    app.set_granularity(granularity);
                    ui.close_menu();
                }
            }
        });

        ui.separator();
        ui.selectable_value(&mut app.view, ViewMode::Gantt, "Gantt");
        ui.selectable_value(&mut app.view, ViewMode::Network, "Network");

        if app.view == ViewMode::Gantt {
            ui.separator();
            if ui.small_button(egui_phosphor::regular::MAGNIFYING_GLASS_MINUS).clicked() {
                app.zoom_out();
            }
            ui.label(
                RichText::new(format!("{:.0}%", app.timeline.zoom * 100.0))
                    .font(theme::font_sub())
                    .color(theme::TEXT_SECONDARY),
            );
            if ui.small_button(egui_phosphor::regular::MAGNIFYING_GLASS_PLUS).clicked() {
                app.zoom_in();
            }
        } else if ui
            .small_button(format!("{} Re-layout", egui_phosphor::regular::ARROWS_CLOCKWISE))
            .clicked()
        {
            app.relayout();
        }

        // Right-aligned project name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let source = if app.file_path.is_some() { "" } else { " (sample)" };
            ui.label(
                RichText::new(format!("{}{}", app.project.name, source))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
