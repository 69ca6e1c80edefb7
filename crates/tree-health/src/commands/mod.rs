//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod chart;
pub mod dashboard;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use chart::{execute_chart, validate_args};
pub use dashboard::execute_dashboard;
pub use models::{ChartArgs, DashboardArgs};
pub use utils::{census_fields, display_boroughs, display_schema, display_version, validate_chart_file};
