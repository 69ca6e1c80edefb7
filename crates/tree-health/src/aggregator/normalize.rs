//! Expand pivoted groups into proportion rows for charting.

use crate::parser::schema::{Health, NormalizedRow, PivotedGroup, RankedSelection};
use log::debug;

/// Melt selected groups into one row per status
///
/// **Public** - third stage of the pipeline
///
/// A group with a zero total gets proportion 0 for every status.
pub fn normalize(groups: &[PivotedGroup], selection: &RankedSelection) -> Vec<NormalizedRow> {
    let rows: Vec<NormalizedRow> = groups
        .iter()
        .filter(|group| selection.contains(&group.key.category))
        .flat_map(|group| {
            Health::ALL.iter().map(move |&status| {
                let count = group.counts.get(status);
                NormalizedRow {
                    region: group.key.region.clone(),
                    category: group.key.category.clone(),
                    sub_dimension: group.key.sub_dimension.clone(),
                    status,
                    count,
                    total: group.total,
                    proportion: proportion(count, group.total),
                }
            })
        })
        .collect();

    debug!("Normalized {} rows for {} categories", rows.len(), selection.len());
    rows
}

fn proportion(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
