//! Region-selection handler for the two dashboard panels.
//!
//! Each selection runs the pipeline from scratch for every panel. Panels are
//! independent: a provider failure in one does not affect the other.

use crate::aggregator::run_pipeline;
use crate::chart::{build_chart_spec, ChartConfig, ChartSpec};
use crate::parser::schema::{Borough, PipelineMode};
use crate::provider::{CountQuery, RecordSource};
use crate::utils::config::DashboardConfig;
use crate::utils::error::ProviderError;
use log::{info, warn};

/// Charts shown on the dashboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    TreeHealth,
    StewardEffectiveness,
}

impl Panel {
    pub const ALL: [Panel; 2] = [Panel::TreeHealth, Panel::StewardEffectiveness];

    /// Stable identifier, also used for output file names
    pub fn id(&self) -> &'static str {
        match self {
            Panel::TreeHealth => "tree-health",
            Panel::StewardEffectiveness => "steward-effectiveness",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Panel::TreeHealth => "Tree Health",
            Panel::StewardEffectiveness => "Steward Effectiveness",
        }
    }

    pub fn mode(&self) -> PipelineMode {
        match self {
            Panel::TreeHealth => PipelineMode::Simple,
            Panel::StewardEffectiveness => PipelineMode::Faceted,
        }
    }
}

/// Outcome of rendering one panel
#[derive(Debug)]
pub enum PanelRender {
    Rendered { panel: Panel, spec: ChartSpec },
    Failed { panel: Panel, error: ProviderError },
}

impl PanelRender {
    pub fn panel(&self) -> Panel {
        match self {
            PanelRender::Rendered { panel, .. } | PanelRender::Failed { panel, .. } => *panel,
        }
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        match self {
            PanelRender::Rendered { spec, .. } => Some(spec),
            PanelRender::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PanelRender::Failed { .. })
    }
}

/// Run fetch -> pivot -> rank -> normalize -> chart for one panel
pub fn render_panel(
    config: &DashboardConfig,
    source: &dyn RecordSource,
    borough: Borough,
    panel: Panel,
) -> Result<ChartSpec, ProviderError> {
    let mode = panel.mode();
    let query = CountQuery::new(borough, mode, config.row_limit);

    let records = source.fetch(&query)?;
    info!(
        "{}: {} records for {} from {}",
        panel.id(),
        records.len(),
        borough,
        source.describe()
    );

    let output = run_pipeline(&records, config.top_n);
    if output.dropped() > 0 {
        warn!(
            "{}: {} trees had a health status outside Good/Fair/Poor",
            panel.id(),
            output.dropped()
        );
    }

    Ok(build_chart_spec(
        &output,
        borough,
        mode,
        &ChartConfig::from(config),
    ))
}

/// Re-render every panel for a newly selected borough
///
/// **Public** - replaces the callback-driven UI update with an explicit call
pub fn handle_region_selected(
    config: &DashboardConfig,
    source: &dyn RecordSource,
    borough: Borough,
) -> Vec<PanelRender> {
    info!("Borough selected: {}", borough);

    Panel::ALL
        .iter()
        .map(|&panel| match render_panel(config, source, borough, panel) {
            Ok(spec) => PanelRender::Rendered { panel, spec },
            Err(error) => {
                warn!("{} panel failed: {}", panel.id(), error);
                PanelRender::Failed { panel, error }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{CountRecord, Health};
    use crate::provider::StaticSource;

    /// Source that fails faceted queries only
    struct FlakySource(StaticSource);

    impl RecordSource for FlakySource {
        fn fetch(&self, query: &CountQuery) -> Result<Vec<CountRecord>, ProviderError> {
            match query.mode {
                PipelineMode::Faceted => Err(ProviderError::SchemaMismatch {
                    index: 0,
                    reason: "missing 'health' column".to_string(),
                }),
                PipelineMode::Simple => self.0.fetch(query),
            }
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    fn source() -> StaticSource {
        StaticSource::new(vec![
            CountRecord::new("Bronx", "Oak", Health::Good, 10).with_sub_dimension("None"),
            CountRecord::new("Bronx", "Oak", Health::Poor, 5).with_sub_dimension("1or2"),
            CountRecord::new("Bronx", "Pine", Health::Fair, 3).with_sub_dimension("None"),
        ])
    }

    #[test]
    fn test_both_panels_render() {
        let renders = handle_region_selected(&DashboardConfig::default(), &source(), Borough::Bronx);

        assert_eq!(renders.len(), 2);
        assert_eq!(renders[0].panel(), Panel::TreeHealth);
        assert_eq!(renders[1].panel(), Panel::StewardEffectiveness);
        assert_eq!(renders[0].panel().heading(), "Tree Health");
        assert!(renders.iter().all(|r| !r.is_failed()));

        let steward = renders[1].spec().unwrap();
        assert_eq!(steward.facets().len(), 2);
    }

    #[test]
    fn test_failure_is_local_to_panel() {
        let flaky = FlakySource(source());
        let renders = handle_region_selected(&DashboardConfig::default(), &flaky, Borough::Bronx);

        assert!(!renders[0].is_failed());
        assert!(renders[1].is_failed());
    }

    #[test]
    fn test_empty_borough_renders_empty_charts() {
        let renders = handle_region_selected(&DashboardConfig::default(), &source(), Borough::Queens);

        for render in &renders {
            let spec = render.spec().unwrap();
            assert!(spec.is_empty());
            assert!(spec.category_order.is_empty());
        }
    }
}
