//! Chart command implementation.
//!
//! The chart command:
//! 1. Fetches grouped counts from the provider (or a saved response)
//! 2. Pivots, ranks and normalizes them
//! 3. Builds the chart spec
//! 4. Writes output files

use super::models::ChartArgs;
use crate::aggregator::run_pipeline;
use crate::chart::{build_chart_spec, generate_text_summary, render_svg, ChartConfig, ChartSpec};
use crate::output::{write_chart_spec, write_svg};
use crate::provider::{CensusClient, CountQuery, FileSource, RecordSource};
use crate::utils::config::DashboardConfig;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;
use std::time::Instant;

/// Execute a single-chart command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Provider connection failures or schema mismatches
/// * File write errors
pub fn execute_chart(args: ChartArgs) -> Result<ChartSpec> {
    let start_time = Instant::now();

    info!(
        "Starting {:?} chart for {} (top {})",
        args.mode, args.borough, args.config.top_n
    );

    let source = open_source(&args.config, args.input.as_deref())?;
    let query = CountQuery::new(args.borough, args.mode, args.config.row_limit);

    info!("Fetching grouped counts from {}...", source.describe());
    let records = source
        .fetch(&query)
        .with_context(|| format!("Failed to fetch tree counts for {}", args.borough))?;

    info!("Pivoting and ranking {} records...", records.len());
    let output = run_pipeline(&records, args.config.top_n);
    debug!(
        "{} groups, {} species selected, {} rows",
        output.groups.len(),
        output.selection.len(),
        output.rows.len()
    );

    if output.dropped() > 0 {
        warn!(
            "{} trees had a health status outside Good/Fair/Poor and were left out of totals",
            output.dropped()
        );
    }

    let mut chart_config = ChartConfig::from(&args.config);
    if let Some(title) = &args.title {
        chart_config = chart_config.with_title(title.clone());
    }
    let spec = build_chart_spec(&output, args.borough, args.mode, &chart_config);

    write_outputs(&spec, &args.output_json, args.output_svg.as_deref())?;

    if args.print_summary {
        println!("\n{}\n", generate_text_summary(&spec));
    }

    info!(
        "Chart completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(spec)
}

/// Pick the record source: a saved response if given, the live endpoint otherwise
///
/// **Public** - shared with the dashboard command
pub fn open_source(config: &DashboardConfig, input: Option<&Path>) -> Result<Box<dyn RecordSource>> {
    match input {
        Some(path) => Ok(Box::new(FileSource::new(path))),
        None => {
            let client = CensusClient::new(config.endpoint.clone())
                .context("Failed to create census client")?
                .with_app_token(config.app_token.clone());
            Ok(Box::new(client))
        }
    }
}

/// Write the JSON spec and, when requested, the SVG render
///
/// **Public** - shared with the dashboard command
pub fn write_outputs(spec: &ChartSpec, output_json: &Path, output_svg: Option<&Path>) -> Result<()> {
    write_chart_spec(spec, output_json).context("Failed to write chart spec JSON")?;
    info!("✓ Chart spec written to: {}", output_json.display());

    if let Some(svg_path) = output_svg {
        let svg = render_svg(spec).context("Failed to render chart SVG")?;
        write_svg(&svg, svg_path).context("Failed to write chart SVG")?;
        info!("✓ Chart SVG written to: {}", svg_path.display());
    }

    Ok(())
}

/// Validate chart arguments
///
/// **Public** - can be called before execute_chart for early validation
pub fn validate_args(args: &ChartArgs) -> Result<()> {
    args.config
        .validate()
        .context("Invalid dashboard configuration")?;

    if let Some(input) = &args.input {
        if !input.is_file() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if let Some(title) = &args.title {
        if title.trim().is_empty() {
            anyhow::bail!("Title cannot be blank");
        }
    }

    Ok(())
}
