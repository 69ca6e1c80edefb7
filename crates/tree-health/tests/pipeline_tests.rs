use pretty_assertions::assert_eq;
use tree_health::aggregator::{normalize, pivot, rank, run_pipeline};
use tree_health::parser::{parse_records, CountRecord, Health, HealthLabel, NormalizedRow, PipelineMode};

const TOLERANCE: f64 = 1e-9;

fn example_records() -> Vec<CountRecord> {
    vec![
        CountRecord::new("Bronx", "Oak", Health::Good, 10),
        CountRecord::new("Bronx", "Oak", Health::Poor, 5),
        CountRecord::new("Bronx", "Pine", Health::Fair, 3),
    ]
}

fn proportion_of(rows: &[NormalizedRow], category: &str, status: Health) -> f64 {
    rows.iter()
        .find(|r| r.category == category && r.status == status)
        .map(|r| r.proportion)
        .unwrap()
}

/// Roughly what the Bronx steward query returns for a handful of species
fn steward_records() -> Vec<CountRecord> {
    let rows: &[(&str, &str, Health, u64)] = &[
        ("London planetree", "1or2", Health::Fair, 120),
        ("London planetree", "1or2", Health::Good, 910),
        ("London planetree", "1or2", Health::Poor, 40),
        ("London planetree", "None", Health::Fair, 600),
        ("London planetree", "None", Health::Good, 4100),
        ("London planetree", "None", Health::Poor, 210),
        ("honeylocust", "3or4", Health::Good, 80),
        ("honeylocust", "None", Health::Fair, 300),
        ("honeylocust", "None", Health::Good, 2500),
        ("pin oak", "None", Health::Good, 1900),
        ("pin oak", "None", Health::Poor, 90),
        ("Norway maple", "4orMore", Health::Poor, 1),
        ("Norway maple", "None", Health::Good, 1500),
        ("ginkgo", "None", Health::Good, 20),
    ];

    rows.iter()
        .map(|(species, steward, health, count)| {
            CountRecord::new("Bronx", *species, *health, *count).with_sub_dimension(*steward)
        })
        .collect()
}

#[test]
fn test_worked_example() {
    let output = run_pipeline(&example_records(), 2);

    assert_eq!(output.selection.categories, vec!["Oak", "Pine"]);

    let rows = &output.rows;
    assert!((proportion_of(rows, "Oak", Health::Good) - 10.0 / 15.0).abs() < TOLERANCE);
    assert_eq!(proportion_of(rows, "Oak", Health::Fair), 0.0);
    assert!((proportion_of(rows, "Oak", Health::Poor) - 5.0 / 15.0).abs() < TOLERANCE);

    assert_eq!(proportion_of(rows, "Pine", Health::Good), 0.0);
    assert_eq!(proportion_of(rows, "Pine", Health::Fair), 1.0);
    assert_eq!(proportion_of(rows, "Pine", Health::Poor), 0.0);
}

#[test]
fn test_proportions_sum_to_one_per_group() {
    let output = run_pipeline(&steward_records(), 10);

    for group in output.groups.iter().filter(|g| g.total > 0) {
        let sum: f64 = output
            .rows
            .iter()
            .filter(|r| r.category == group.key.category && r.sub_dimension == group.key.sub_dimension)
            .map(|r| r.proportion)
            .sum();
        assert!(
            (sum - 1.0).abs() < TOLERANCE,
            "{:?} sums to {}",
            group.key,
            sum
        );
    }
}

#[test]
fn test_selection_size_bounds() {
    let groups = pivot(&steward_records());

    for n in [1, 3, 5, 10, 50] {
        let selection = rank(&groups, n);
        assert!(selection.len() <= n);
        assert!(selection.len() <= 5);
        assert_eq!(selection.len(), n.min(5));
    }
}

#[test]
fn test_ranking_uses_totals_across_stewards() {
    let output = run_pipeline(&steward_records(), 3);

    // London planetree 5980, honeylocust 2880, pin oak 1990, Norway maple 1501
    assert_eq!(
        output.selection.categories,
        vec!["London planetree", "honeylocust", "pin oak"]
    );
}

#[test]
fn test_total_computed_before_filtering() {
    let output = run_pipeline(&steward_records(), 1);

    let planetree_none = output
        .groups
        .iter()
        .find(|g| g.key.category == "London planetree" && g.key.sub_dimension.as_deref() == Some("None"))
        .unwrap();
    assert_eq!(planetree_none.total, 600 + 4100 + 210);

    assert!(output.rows.iter().all(|r| r.category == "London planetree"));
    assert_eq!(output.rows.len(), 2 * 3);
}

#[test]
fn test_pipeline_is_idempotent() {
    let records = steward_records();

    let first = run_pipeline(&records, 4);
    let second = run_pipeline(&records, 4);

    assert_eq!(first.rows, second.rows);
    assert_eq!(
        serde_json::to_string(&first.rows).unwrap(),
        serde_json::to_string(&second.rows).unwrap()
    );
}

#[test]
fn test_empty_input_produces_empty_output() {
    let output = run_pipeline(&[], 10);

    assert!(output.groups.is_empty());
    assert!(output.selection.is_empty());
    assert!(output.rows.is_empty());
    assert!(output.is_empty());
}

#[test]
fn test_unrecognized_status_only_category() {
    let records = vec![
        CountRecord::new("Bronx", "Oak", Health::Good, 4),
        CountRecord::new("Bronx", "Stump", HealthLabel::from("Dead"), 12),
    ];

    let output = run_pipeline(&records, 10);
    assert_eq!(output.selection.categories, vec!["Oak", "Stump"]);
    assert_eq!(output.dropped(), 12);

    let stump: Vec<_> = output.rows.iter().filter(|r| r.category == "Stump").collect();
    assert_eq!(stump.len(), 3);
    for row in stump {
        assert_eq!(row.total, 0);
        assert_eq!(row.count, 0);
        assert_eq!(row.proportion, 0.0);
    }
}

#[test]
fn test_stage_functions_compose() {
    let groups = pivot(&example_records());
    let selection = rank(&groups, 1);
    let rows = normalize(&groups, &selection);

    assert_eq!(rows, run_pipeline(&example_records(), 1).rows);
}

#[test]
fn test_maximal_counts_do_not_overflow() {
    let body = serde_json::json!([
        {"boroname": "Bronx", "spc_common": "Oak", "health": "Good", "count_tree_id": "18446744073709551615"},
        {"boroname": "Bronx", "spc_common": "Oak", "health": "Fair", "count_tree_id": "1"},
    ]);

    let records = parse_records(&body, PipelineMode::Simple).unwrap();
    let output = run_pipeline(&records, 10);

    assert_eq!(output.groups[0].total, u64::MAX);
    assert_eq!(output.selection.categories, vec!["Oak"]);
    for row in &output.rows {
        assert!((0.0..=1.0).contains(&row.proportion));
    }
}
