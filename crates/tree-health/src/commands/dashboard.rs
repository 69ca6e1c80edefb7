//! Dashboard command implementation.
//! Renders every panel for one borough and reports per-panel failures.

use super::chart::{open_source, write_outputs};
use super::models::DashboardArgs;
use crate::chart::generate_text_summary;
use crate::dashboard::{handle_region_selected, PanelRender};
use anyhow::{Context, Result};
use colored::*;
use log::info;

/// Execute the dashboard command
pub fn execute_dashboard(args: DashboardArgs) -> Result<Vec<PanelRender>> {
    args.config
        .validate()
        .context("Invalid dashboard configuration")?;

    let borough = args.borough.unwrap_or(args.config.default_borough);
    let source = open_source(&args.config, args.input.as_deref())?;

    let renders = handle_region_selected(&args.config, source.as_ref(), borough);

    for render in &renders {
        let panel = render.panel();
        match render {
            PanelRender::Rendered { spec, .. } => {
                let json_path = args.output_dir.join(format!("{}.json", panel.id()));
                let svg_path = args
                    .svg
                    .then(|| args.output_dir.join(format!("{}.svg", panel.id())));

                write_outputs(spec, &json_path, svg_path.as_deref())
                    .with_context(|| format!("Failed to write {} panel", panel.id()))?;

                if args.print_summary {
                    println!("\n{}", panel.heading().bold());
                    println!("{}\n", generate_text_summary(spec));
                }
            }
            PanelRender::Failed { error, .. } => {
                println!(
                    "{} {}: {}",
                    "✗".red(),
                    panel.heading(),
                    error.to_string().red()
                );
            }
        }
    }

    let failed = renders.iter().filter(|r| r.is_failed()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} panels failed to render", failed, renders.len());
    }

    info!("Dashboard for {} written to {}", borough, args.output_dir.display());
    Ok(renders)
}
