use crate::parser::schema::{Borough, PipelineMode};
use crate::utils::config::DashboardConfig;
use std::path::PathBuf;

/// Arguments for the single-chart commands (`health`, `steward`)
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ChartArgs {
    /// Borough to chart
    pub borough: Borough,

    /// Simple (species) or faceted (species x steward)
    pub mode: PipelineMode,

    /// Endpoint, top-N and layout settings
    pub config: DashboardConfig,

    /// Saved provider response to use instead of the live endpoint
    pub input: Option<PathBuf>,

    /// Output path for the JSON chart spec
    pub output_json: PathBuf,

    /// Output path for the SVG render (optional)
    pub output_svg: Option<PathBuf>,

    /// Chart title override
    pub title: Option<String>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ChartArgs {
    fn default() -> Self {
        Self {
            borough: Borough::Bronx,
            mode: PipelineMode::Simple,
            config: DashboardConfig::default(),
            input: None,
            output_json: PathBuf::from("tree-health.json"),
            output_svg: None,
            title: None,
            print_summary: false,
        }
    }
}

/// Arguments for the dashboard command
#[derive(Debug, Clone)]
pub struct DashboardArgs {
    /// Borough to render; falls back to the configured default
    pub borough: Option<Borough>,

    pub config: DashboardConfig,

    /// Saved provider response to use instead of the live endpoint
    pub input: Option<PathBuf>,

    /// Directory receiving one JSON spec (and SVG) per panel
    pub output_dir: PathBuf,

    /// Also render SVG files
    pub svg: bool,

    /// Print text summaries to stdout
    pub print_summary: bool,
}

impl Default for DashboardArgs {
    fn default() -> Self {
        Self {
            borough: None,
            config: DashboardConfig::default(),
            input: None,
            output_dir: PathBuf::from("artifacts"),
            svg: false,
            print_summary: false,
        }
    }
}
