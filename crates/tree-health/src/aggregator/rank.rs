//! Top-N species ranking.

use crate::parser::schema::{PivotedGroup, RankedSelection};
use log::debug;
use std::collections::HashMap;

/// Select the `top_n` categories with the largest summed total
///
/// **Public** - second stage of the pipeline
///
/// Totals are summed per category across all of its groups, so steward
/// groups collapse into their species. Ties keep first-encountered order.
///
/// # Returns
/// At most `min(top_n, distinct categories)` names, highest total first
pub fn rank(groups: &[PivotedGroup], top_n: usize) -> RankedSelection {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, u64)> = Vec::new();

    for group in groups {
        let category = group.key.category.as_str();
        match index.get(category) {
            Some(&slot) => totals[slot].1 = totals[slot].1.saturating_add(group.total),
            None => {
                index.insert(category, totals.len());
                totals.push((category, group.total));
            }
        }
    }

    // sort_by is stable, which preserves input order among equal totals
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    let categories: Vec<String> = totals
        .iter()
        .take(top_n)
        .map(|(category, _)| category.to_string())
        .collect();

    debug!(
        "Ranked {} categories, kept top {}",
        totals.len(),
        categories.len()
    );

    RankedSelection { categories }
}
