#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use std::path::PathBuf;

use gantt_engine::{io, EngineConfig, Project};
use tracing_subscriber::EnvFilter;

/// Environment variable naming an engine configuration JSON file.
const CONFIG_ENV: &str = "GANTT_ENGINE_CONFIG";

/// `$GANTT_ENGINE_CONFIG`, else `config.json` in the platform config dir.
fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let dirs = directories::ProjectDirs::from("", "", "GanttEngine")?;
    let path = dirs.config_dir().join("config.json");
    path.exists().then_some(path)
}

fn load_config() -> EngineConfig {
    let Some(path) = config_path() else {
        return EngineConfig::default();
    };
    match io::load_config(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "configuration loaded");
            config
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "using default configuration");
            EngineConfig::default()
        }
    }
}

fn load_project() -> (Project, Option<PathBuf>) {
    let today = chrono::Local::now().date_naive();
    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        return (Project::sample(today), None);
    };
    match io::load_project(&path) {
        Ok(project) => (project, Some(path)),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "falling back to sample project");
            (Project::sample(today), None)
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config();
    let (project, path) = load_project();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt Engine"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt Engine",
        options,
        Box::new(move |cc| Ok(Box::new(app::GanttApp::new(cc, project, path, config)))),
    )
}
