use std::path::Path;

use crate::config::EngineConfig;
use crate::error::LoadError;
use crate::model::{Project, ProjectRecord};

/// Load a project snapshot from a JSON file in the wire format.
pub fn load_project(path: &Path) -> Result<Project, LoadError> {
    let json = std::fs::read_to_string(path)?;
    parse_project(&json)
}

pub fn parse_project(json: &str) -> Result<Project, LoadError> {
    let record: ProjectRecord = serde_json::from_str(json)?;
    let project = Project::from(record);
    tracing::info!(
        name = %project.name,
        tasks = project.tasks.len(),
        dependencies = project.dependencies.len(),
        "project loaded"
    );
    Ok(project)
}

/// Load engine configuration; missing fields keep their defaults.
pub fn load_config(path: &Path) -> Result<EngineConfig, LoadError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
