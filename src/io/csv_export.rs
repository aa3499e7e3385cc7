use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::model::Task;
use crate::schedule::Schedule;

const HEADER: [&str; 7] = [
    "Task",
    "Start Date",
    "End Date",
    "Scheduled Start",
    "Scheduled End",
    "Placeholder",
    "Conflicts",
];

/// Write one row per task: its own dates next to the propagated interval.
///
/// Semicolon-delimited, ISO-8601 dates. Undated tasks leave their own date
/// columns empty. Returns the number of tasks written.
pub fn write_schedule<W: Write>(
    tasks: &[Task],
    schedule: &Schedule,
    writer: W,
) -> Result<usize, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    let iso = |d: Option<chrono::NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    for task in tasks {
        let resolved = schedule.interval(task.id);
        let conflicts = schedule.violations_for(task.id).count();
        wtr.write_record([
            task.title.clone(),
            iso(task.start_date),
            iso(task.end_date),
            iso(resolved.map(|iv| iv.start)),
            iso(resolved.map(|iv| iv.end)),
            resolved.is_some_and(|iv| iv.placeholder).to_string(),
            conflicts.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(tasks.len())
}

pub fn export_schedule(tasks: &[Task], schedule: &Schedule, path: &Path) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path)?;
    let count = write_schedule(tasks, schedule, file)?;
    tracing::info!(path = %path.display(), tasks = count, "schedule exported");
    Ok(count)
}
