//! Tree Health Studio CLI
//!
//! Charts tree health for the top species of a NYC borough,
//! using live Street Tree Census data or a saved response.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use tree_health::commands::{
    display_boroughs, display_schema, display_version, execute_chart, execute_dashboard,
    validate_args, validate_chart_file, ChartArgs, DashboardArgs,
};
use tree_health::parser::{Borough, PipelineMode};
use tree_health::utils::config::{load_config, DashboardConfig};

/// Tree Health Studio - species health charts for NYC street trees
#[derive(Parser, Debug)]
#[command(name = "tree-health")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Dashboard configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by every chart-producing command
#[derive(Args, Debug)]
struct SourceOpts {
    /// Borough to chart (defaults to the configured borough)
    #[arg(short, long)]
    borough: Option<Borough>,

    /// SODA resource URL
    #[arg(long, env = "TREE_HEALTH_ENDPOINT")]
    endpoint: Option<String>,

    /// Socrata application token
    #[arg(long, env = "SODA_APP_TOKEN", hide_env_values = true)]
    app_token: Option<String>,

    /// Saved SODA response to read instead of querying the endpoint
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Number of top species to keep
    #[arg(long)]
    top: Option<usize>,

    /// Print text summary to stdout
    #[arg(long)]
    summary: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Stacked health proportions for the top species
    Health {
        #[command(flatten)]
        source: SourceOpts,

        /// Output path for the JSON chart spec
        #[arg(short, long, default_value = "artifacts/tree-health.json")]
        output: PathBuf,

        /// Output path for an SVG render (optional)
        #[arg(long, default_missing_value = "artifacts/tree-health.svg", num_args = 0..=1)]
        svg: Option<PathBuf>,

        /// Chart title
        #[arg(long)]
        title: Option<String>,
    },

    /// Health proportions by stewardship level, one facet per top species
    Steward {
        #[command(flatten)]
        source: SourceOpts,

        /// Output path for the JSON chart spec
        #[arg(short, long, default_value = "artifacts/steward-effectiveness.json")]
        output: PathBuf,

        /// Output path for an SVG render (optional)
        #[arg(long, default_missing_value = "artifacts/steward-effectiveness.svg", num_args = 0..=1)]
        svg: Option<PathBuf>,

        /// Chart title
        #[arg(long)]
        title: Option<String>,
    },

    /// Render both dashboard panels for a borough
    Dashboard {
        #[command(flatten)]
        source: SourceOpts,

        /// Directory for the panel outputs
        #[arg(long, default_value = "artifacts")]
        out_dir: PathBuf,

        /// Also write SVG renders
        #[arg(long)]
        svg: bool,
    },

    /// Validate a chart spec JSON file
    Validate {
        /// Path to chart spec JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List the selectable boroughs
    Boroughs,

    /// Display chart spec schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let base_config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    // Execute command
    match cli.command {
        Commands::Health {
            source,
            output,
            svg,
            title,
        } => {
            run_chart(base_config, source, PipelineMode::Simple, output, svg, title)?;
        }

        Commands::Steward {
            source,
            output,
            svg,
            title,
        } => {
            run_chart(base_config, source, PipelineMode::Faceted, output, svg, title)?;
        }

        Commands::Dashboard {
            source,
            out_dir,
            svg,
        } => {
            let config = apply_overrides(base_config, &source);
            let args = DashboardArgs {
                borough: source.borough,
                config,
                input: source.input,
                output_dir: out_dir,
                svg,
                print_summary: source.summary,
            };
            execute_dashboard(args)?;
        }

        Commands::Validate { file } => {
            validate_chart_file(file)?;
        }

        Commands::Boroughs => {
            display_boroughs(&base_config);
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Build and run a single chart command
fn run_chart(
    base_config: DashboardConfig,
    source: SourceOpts,
    mode: PipelineMode,
    output: PathBuf,
    svg: Option<PathBuf>,
    title: Option<String>,
) -> Result<()> {
    let config = apply_overrides(base_config, &source);

    let args = ChartArgs {
        borough: source.borough.unwrap_or(config.default_borough),
        mode,
        config,
        input: source.input,
        output_json: output,
        output_svg: svg,
        title,
        print_summary: source.summary,
    };

    // Validate args first
    validate_args(&args)?;

    execute_chart(args)?;
    Ok(())
}

/// Command-line flags take precedence over the config file
fn apply_overrides(mut config: DashboardConfig, source: &SourceOpts) -> DashboardConfig {
    if let Some(endpoint) = &source.endpoint {
        config.endpoint = endpoint.clone();
    }
    if source.app_token.is_some() {
        config.app_token = source.app_token.clone();
    }
    if let Some(top) = source.top {
        config.top_n = top;
    }
    config
}
