//! Aggregation of census records into ranked, chart-ready rows.
//!
//! This module transforms grouped counts into:
//! - Pivoted groups (one count per health status, plus a total)
//! - The top-N species selection
//! - Normalized proportion rows

pub mod normalize;
pub mod pivot;
pub mod rank;

// Re-export main functions
pub use normalize::normalize;
pub use pivot::pivot;
pub use rank::rank;

use crate::parser::schema::{CountRecord, NormalizedRow, PivotedGroup, RankedSelection};

/// Everything one pipeline run produces
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub groups: Vec<PivotedGroup>,
    pub selection: RankedSelection,
    pub rows: Vec<NormalizedRow>,
}

impl PipelineOutput {
    /// Trees excluded from totals because of out-of-set statuses
    pub fn dropped(&self) -> u64 {
        self.groups.iter().map(|g| g.dropped).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Run pivot, rank and normalize over one region's records
pub fn run_pipeline(records: &[CountRecord], top_n: usize) -> PipelineOutput {
    let groups = pivot(records);
    let selection = rank(&groups, top_n);
    let rows = normalize(&groups, &selection);

    PipelineOutput {
        groups,
        selection,
        rows,
    }
}
