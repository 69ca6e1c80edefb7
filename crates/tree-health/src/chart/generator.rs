//! Chart spec generation from pipeline output.
//!
//! Produces the two dashboard charts:
//! - Tree health: one stacked bar per species
//! - Steward effectiveness: one facet per species, stewardship on the x-axis

use super::spec::{ChartSpec, ColorAssignment, Encoding, FacetSpec};
use crate::aggregator::PipelineOutput;
use crate::parser::schema::{Borough, Health, PipelineMode};
use crate::utils::config::{
    DashboardConfig, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_FACET_WRAP, DEFAULT_TOP_N,
    SCHEMA_VERSION,
};
use colored::*;
use log::info;
use std::collections::HashMap;

/// Chart layout configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub top_n: usize,
    pub facet_wrap: usize,
    pub height: u32,
    pub width: u32,
    pub title: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            facet_wrap: DEFAULT_FACET_WRAP,
            height: DEFAULT_CHART_HEIGHT,
            width: DEFAULT_CHART_WIDTH,
            title: None,
        }
    }
}

impl From<&DashboardConfig> for ChartConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            top_n: config.top_n,
            facet_wrap: config.facet_wrap,
            height: config.height,
            width: config.width,
            title: None,
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Default chart title for a mode and borough
pub fn chart_title(mode: PipelineMode, borough: Borough, top_n: usize) -> String {
    match mode {
        PipelineMode::Simple => {
            format!("Tree Health in {} for Top {} Species", borough, top_n)
        }
        PipelineMode::Faceted => {
            format!("Steward Effectiveness in {} for Top {} Species", borough, top_n)
        }
    }
}

/// Build the declarative chart for one pipeline run
///
/// **Public** - the render stage of the pipeline
///
/// An empty pipeline output yields a chart with no data and no categories.
pub fn build_chart_spec(
    output: &PipelineOutput,
    borough: Borough,
    mode: PipelineMode,
    config: &ChartConfig,
) -> ChartSpec {
    let title = config
        .title
        .clone()
        .unwrap_or_else(|| chart_title(mode, borough, config.top_n));

    let (encoding, facet, width) = match mode {
        PipelineMode::Simple => (
            Encoding {
                x: "category".to_string(),
                y: "proportion".to_string(),
                color: "status".to_string(),
            },
            None,
            Some(config.width),
        ),
        PipelineMode::Faceted => (
            Encoding {
                x: "sub_dimension".to_string(),
                y: "proportion".to_string(),
                color: "status".to_string(),
            },
            Some(FacetSpec {
                field: "category".to_string(),
                columns: config.facet_wrap,
            }),
            None,
        ),
    };

    info!(
        "Building {:?} chart '{}' ({} rows, {} species)",
        mode,
        title,
        output.rows.len(),
        output.selection.len()
    );

    ChartSpec {
        version: SCHEMA_VERSION.to_string(),
        title,
        borough,
        mode,
        mark: "bar".to_string(),
        stacked: true,
        encoding,
        color_map: Health::ALL
            .iter()
            .map(|&status| ColorAssignment {
                status,
                color: status.color().to_string(),
            })
            .collect(),
        facet,
        category_order: output.selection.categories.clone(),
        height: config.height,
        width,
        data: output.rows.clone(),
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Generate a text summary of a chart for terminal output
pub fn generate_text_summary(spec: &ChartSpec) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  {}", spec.title.bold()));

    if spec.is_empty() {
        lines.push("  (no trees matched this borough)".to_string());
        return lines.join("\n");
    }

    lines.push(format!(
        "  {:>4}  {:<32} {:>8} {:>8} {:>8} {:>8}",
        "#", "Species", "Trees", "Good", "Fair", "Poor"
    ));
    lines.push(format!("  {}", "-".repeat(74)));

    for (position, category) in spec.category_order.iter().enumerate() {
        let mut counts: HashMap<Health, u64> = HashMap::new();
        for row in spec.rows_for(category) {
            *counts.entry(row.status).or_insert(0) += row.count;
        }
        let total: u64 = counts.values().sum();

        let share = |status: Health| -> String {
            let count = counts.get(&status).copied().unwrap_or(0);
            let pct = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            format!("{:>7.1}%", pct)
        };

        lines.push(format!(
            "  {:>4}  {:<32} {:>8} {} {} {}",
            position + 1,
            truncate(category, 32),
            total,
            share(Health::Good).green(),
            share(Health::Fair).yellow(),
            share(Health::Poor).red()
        ));
    }

    lines.join("\n")
}

/// Helper to truncate strings with ellipsis for table display
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
