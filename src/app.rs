use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use gantt_engine::layout::{self, Focus, Granularity, NodePosition, Timeline};
use gantt_engine::schedule::auto_fix_all;
use gantt_engine::{
    propagate, resolve, CycleError, EngineConfig, Project, ResolveStrategy, Schedule, UpdatedTask,
};
use uuid::Uuid;

use crate::ui;
use crate::ui::violations_panel::PanelAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Gantt,
    Network,
}

/// Dates being picked in the manual resolve dialog.
#[derive(Debug, Clone)]
pub struct ManualEdit {
    pub task_id: Uuid,
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Main application state.
pub struct GanttApp {
    pub project: Project,
    pub file_path: Option<PathBuf>,
    pub config: EngineConfig,
    pub today: NaiveDate,
    pub view: ViewMode,
    pub timeline: Timeline,

    // Derived from the project; rebuilt by `recompute`.
    schedule: Result<Schedule, CycleError>,
    conflicted: HashSet<Uuid>,
    network: Vec<NodePosition>,

    pub selected_dependency: Option<Uuid>,

    // Dialog state
    pub manual_edit: Option<ManualEdit>,

    // Status message
    pub status_message: String,
}

impl GanttApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        project: Project,
        file_path: Option<PathBuf>,
        config: EngineConfig,
    ) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let today = chrono::Local::now().date_naive();
        let timeline = Timeline::fit(
            &project.tasks,
            Granularity::default(),
            1.0,
            today,
            &config.timeline,
        );
        let mut app = Self {
            project,
            file_path,
            config,
            today,
            view: ViewMode::Gantt,
            timeline,
            schedule: Ok(Schedule::default()),
            conflicted: HashSet::new(),
            network: Vec::new(),
            selected_dependency: None,
            manual_edit: None,
            status_message: "Ready".to_string(),
        };
        app.recompute();
        app
    }

    /// Rerun propagation, refit the timeline and re-layout the network.
    pub fn recompute(&mut self) {
        let tasks = &self.project.tasks;
        let deps = &self.project.dependencies;
        self.schedule = propagate(tasks, deps, self.today, &self.config);
        self.conflicted = match &self.schedule {
            Ok(schedule) => schedule.violations.iter().map(|v| v.task_id).collect(),
            Err(cycle) => cycle.task_ids.iter().copied().collect(),
        };
        self.timeline = Timeline::fit(
            tasks,
            self.timeline.granularity,
            self.timeline.zoom,
            self.today,
            &self.config.timeline,
        );
        self.network = layout::layout(tasks, deps, &self.config.force);

        if let Err(cycle) = &self.schedule {
            self.status_message = cycle.to_string();
        }
    }

    /// Run the force simulation again from the initial circle.
    pub fn relayout(&mut self) {
        self.network = layout::layout(
            &self.project.tasks,
            &self.project.dependencies,
            &self.config.force,
        );
    }

    // --- File operations ---

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["json"])
            .pick_file()
        {
            match gantt_engine::io::load_project(&path) {
                Ok(project) => {
                    self.project = project;
                    self.file_path = Some(path);
                    self.selected_dependency = None;
                    self.status_message = "Project loaded".to_string();
                    self.recompute();
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load project");
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn export_schedule(&mut self) {
        let schedule = match &self.schedule {
            Ok(schedule) => schedule,
            Err(e) => {
                self.status_message = format!("Nothing to export: {}", e);
                return;
            }
        };
        let default_name = format!("{}.schedule.csv", self.project.name);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&default_name)
            .save_file()
        {
            match gantt_engine::io::export_schedule(&self.project.tasks, schedule, &path) {
                Ok(count) => {
                    self.status_message = format!("Exported {} tasks to CSV", count);
                }
                Err(e) => {
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    pub fn load_sample(&mut self) {
        self.project = Project::sample(self.today);
        self.file_path = None;
        self.selected_dependency = None;
        self.status_message = "Sample project loaded".to_string();
        self.recompute();
    }

    // --- Timeline ---

    pub fn zoom_in(&mut self) {
        self.timeline = self.timeline.zoomed_in(&self.config.timeline);
    }

    pub fn zoom_out(&mut self) {
        self.timeline = self.timeline.zoomed_out(&self.config.timeline);
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        // The padding depends on granularity, so refit rather than rescale.
        self.timeline = Timeline::fit(
            &self.project.tasks,
            granularity,
            self.timeline.zoom,
            self.today,
            &self.config.timeline,
        );
    }

    // --- Conflict resolution ---

    pub fn auto_fix(&mut self, task_id: Uuid) {
        let result = resolve(
            &self.project.tasks,
            &self.project.dependencies,
            task_id,
            ResolveStrategy::AutoFix,
            self.today,
            &self.config,
        );
        match result {
            Ok(updated) => self.apply_update(updated),
            Err(e) => {
                self.status_message = format!("Auto-fix failed: {}", e);
            }
        }
    }

    /// Open the manual dates dialog seeded with the task's current interval.
    pub fn edit_dates(&mut self, task_id: Uuid) {
        let Some(task) = self.project.task(task_id) else {
            return;
        };
        let current = task.interval(self.today, self.config.placeholder_days);
        self.manual_edit = Some(ManualEdit {
            task_id,
            title: task.title.clone(),
            start: current.start,
            end: current.end,
        });
    }

    /// Store a resolved task and rebuild everything derived from it.
    pub fn apply_update(&mut self, updated: UpdatedTask) {
        let UpdatedTask {
            task,
            changed,
            violations,
        } = updated;
        let title = task.title.clone();
        if let Some(slot) = self.project.task_mut(task.id) {
            *slot = task;
        }
        self.recompute();
        self.status_message = match (changed, violations.len()) {
            (false, 0) => format!("'{}' already satisfies its links", title),
            (true, 0) => format!("Moved '{}'", title),
            (_, n) => format!("Moved '{}' ({} links still violated)", title, n),
        };
    }

    pub fn fix_all(&mut self) {
        match auto_fix_all(
            &self.project.tasks,
            &self.project.dependencies,
            self.today,
            &self.config,
        ) {
            Ok(tasks) => {
                let moved = tasks
                    .iter()
                    .zip(&self.project.tasks)
                    .filter(|(new, old)| new != old)
                    .count();
                self.project.tasks = tasks;
                self.recompute();
                self.status_message = format!("Rescheduled {} tasks", moved);
            }
            Err(e) => {
                self.status_message = e.to_string();
            }
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let conflicts = self.schedule.as_ref().map_or(0, |s| s.violations.len());
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {} · Links: {} · Conflicts: {}",
                                self.project.tasks.len(),
                                self.project.dependencies.len(),
                                conflicts
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Right panel: conflicts
        let mut panel_action = PanelAction::None;
        egui::SidePanel::right("violations_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                panel_action = ui::violations_panel::show_violations_panel(
                    &self.project.tasks,
                    self.schedule.as_ref(),
                    ui,
                );
            });

        let hovered = match panel_action {
            PanelAction::Hover(id) => Some(id),
            _ => None,
        };

        // Central panel: chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let focus = Focus {
            hovered_task: hovered,
            selected_dependency: self.selected_dependency,
        };
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| match self.view {
            ViewMode::Gantt => {
                let input = ui::gantt_chart::GanttInput {
                    tasks: &self.project.tasks,
                    dependencies: &self.project.dependencies,
                    schedule: self.schedule.as_ref().ok(),
                    timeline: &self.timeline,
                    today: self.today,
                    config: &self.config,
                    focus,
                    conflicted: &self.conflicted,
                };
                let interaction = ui::gantt_chart::show_gantt_chart(&input, ui);
                if let Some(hit) = interaction.clicked {
                    self.selected_dependency = hit;
                }
                match interaction.zoom_steps.signum() {
                    1 => self.zoom_in(),
                    -1 => self.zoom_out(),
                    _ => {}
                }
            }
            ViewMode::Network => {
                let interaction = ui::network_view::show_network(
                    &self.project.tasks,
                    &self.project.dependencies,
                    &self.network,
                    &self.conflicted,
                    focus,
                    &self.config,
                    ui,
                );
                if let Some(task_id) = interaction.clicked_task {
                    if let Some(task) = self.project.task(task_id) {
                        self.status_message = format!("Selected '{}'", task.title);
                    }
                }
            }
        });

        match panel_action {
            PanelAction::AutoFix(task_id) => self.auto_fix(task_id),
            PanelAction::EditDates(task_id) => self.edit_dates(task_id),
            PanelAction::FixAll => self.fix_all(),
            PanelAction::Hover(_) | PanelAction::None => {}
        }

        // Dialogs
        ui::dialogs::show_manual_dates_dialog(self, ctx);
    }
}
