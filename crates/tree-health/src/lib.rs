//! Tree Health Studio
//!
//! Top-N species health charts for the NYC Street Tree Census.
//!
//! Grouped counts are fetched from the city's SODA endpoint, pivoted over
//! the fixed Good/Fair/Poor health set, ranked by species total and
//! normalized into proportions ready for a stacked or faceted bar chart.
//!
//! ```ignore
//! use tree_health::aggregator::run_pipeline;
//! use tree_health::chart::{build_chart_spec, ChartConfig};
//! use tree_health::parser::{Borough, PipelineMode};
//!
//! let output = run_pipeline(&records, 10);
//! let spec = build_chart_spec(&output, Borough::Bronx, PipelineMode::Simple, &ChartConfig::new());
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod dashboard;
pub mod output;
pub mod parser;
pub mod provider;
pub mod utils;
