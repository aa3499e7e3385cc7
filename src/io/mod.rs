pub mod csv_export;
pub mod file;

pub use csv_export::{export_schedule, write_schedule};
pub use file::{load_config, load_project, parse_project};
