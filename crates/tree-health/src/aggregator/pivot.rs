//! Pivot grouped-count records into one row per group.
//!
//! Every group gets a count for each status of the fixed set (zero when the
//! provider returned no row for it) and a total over that set.

use crate::parser::schema::{CountRecord, GroupKey, PivotedGroup, StatusCounts};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// Pivot records by every dimension except status
///
/// **Public** - first stage of the pipeline
///
/// Groups are returned in first-appearance order. Records whose status lies
/// outside the fixed set still create their group, but their counts are kept
/// out of `total` and tallied in `dropped` instead.
pub fn pivot(records: &[CountRecord]) -> Vec<PivotedGroup> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<PivotedGroup> = Vec::new();
    let mut unrecognized: BTreeMap<&str, u64> = BTreeMap::new();

    for record in records {
        let key = record.group_key();
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push(PivotedGroup {
                    key: key.clone(),
                    counts: StatusCounts::default(),
                    total: 0,
                    dropped: 0,
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        match record.status.known() {
            Some(health) => group.counts.add(health, record.count),
            None => {
                group.dropped = group.dropped.saturating_add(record.count);
                let tally = unrecognized.entry(record.status.as_str()).or_insert(0);
                *tally = tally.saturating_add(record.count);
            }
        }
    }

    for group in &mut groups {
        group.total = group.counts.total();
    }

    for (label, count) in &unrecognized {
        warn!(
            "Status '{}' is outside Good/Fair/Poor; {} trees excluded from totals",
            label, count
        );
    }

    debug!("Pivoted {} records into {} groups", records.len(), groups.len());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Health, HealthLabel};

    #[test]
    fn test_pivot_fills_missing_statuses() {
        let records = vec![
            CountRecord::new("Bronx", "Oak", Health::Good, 10),
            CountRecord::new("Bronx", "Oak", Health::Poor, 5),
            CountRecord::new("Bronx", "Pine", Health::Fair, 3),
        ];

        let groups = pivot(&records);
        assert_eq!(groups.len(), 2);

        let oak = &groups[0];
        assert_eq!(oak.key.category, "Oak");
        assert_eq!(oak.counts, StatusCounts { fair: 0, good: 10, poor: 5 });
        assert_eq!(oak.total, 15);

        let pine = &groups[1];
        assert_eq!(pine.counts.fair, 3);
        assert_eq!(pine.total, 3);
    }

    #[test]
    fn test_pivot_keeps_first_appearance_order() {
        let records = vec![
            CountRecord::new("Bronx", "zelkova", Health::Good, 1),
            CountRecord::new("Bronx", "ash", Health::Good, 1),
            CountRecord::new("Bronx", "zelkova", Health::Fair, 1),
        ];

        let categories: Vec<_> = pivot(&records)
            .into_iter()
            .map(|g| g.key.category)
            .collect();
        assert_eq!(categories, vec!["zelkova", "ash"]);
    }

    #[test]
    fn test_pivot_groups_by_sub_dimension() {
        let records = vec![
            CountRecord::new("Bronx", "Oak", Health::Good, 4).with_sub_dimension("None"),
            CountRecord::new("Bronx", "Oak", Health::Good, 6).with_sub_dimension("1or2"),
            CountRecord::new("Bronx", "Oak", Health::Poor, 1).with_sub_dimension("None"),
        ];

        let groups = pivot(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].total, 5);
        assert_eq!(groups[1].total, 6);
    }

    #[test]
    fn test_pivot_sums_duplicate_rows() {
        let records = vec![
            CountRecord::new("Bronx", "Oak", Health::Good, 4),
            CountRecord::new("Bronx", "Oak", Health::Good, 6),
        ];

        let groups = pivot(&records);
        assert_eq!(groups[0].counts.good, 10);
    }

    #[test]
    fn test_unrecognized_status_is_dropped_from_total() {
        let records = vec![
            CountRecord::new("Bronx", "Oak", Health::Good, 2),
            CountRecord::new("Bronx", "Oak", HealthLabel::from("Dead"), 7),
            CountRecord::new("Bronx", "Elm", HealthLabel::from("Dead"), 3),
        ];

        let groups = pivot(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].total, 2);
        assert_eq!(groups[0].dropped, 7);
        assert_eq!(groups[1].total, 0);
        assert_eq!(groups[1].dropped, 3);
    }

    #[test]
    fn test_pivot_empty() {
        assert!(pivot(&[]).is_empty());
    }
}
