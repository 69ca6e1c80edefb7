use serde_json::json;
use tree_health::parser::{parse_records, Borough, Health, HealthLabel, PipelineMode};
use tree_health::provider::{CountQuery, RecordSource, StaticSource};
use tree_health::utils::error::ProviderError;

#[test]
fn test_query_matches_dashboard_filters() {
    let query = CountQuery::new(Borough::Brooklyn, PipelineMode::Faceted, 50_000);
    let params = query.to_params();

    let lookup = |key: &str| {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap()
    };

    assert_eq!(
        lookup("$select"),
        "boroname, spc_common, steward, health, count(tree_id)"
    );
    assert_eq!(
        lookup("$where"),
        "boroname = 'Brooklyn' AND steward IS NOT NULL AND health IS NOT NULL"
    );
    assert_eq!(lookup("$order"), "boroname, spc_common, steward, health");
}

#[test]
fn test_parse_keeps_unrecognized_status() {
    let raw = json!([
        {"boroname": "Bronx", "spc_common": "ginkgo", "health": "Dead", "count_tree_id": "2"}
    ]);

    let records = parse_records(&raw, PipelineMode::Simple).unwrap();
    assert_eq!(records[0].status, HealthLabel::Unrecognized("Dead".to_string()));
}

#[test]
fn test_parse_rejects_non_object_rows() {
    let raw = json!([["Bronx", "ginkgo", "Good", "2"]]);

    match parse_records(&raw, PipelineMode::Simple) {
        Err(ProviderError::SchemaMismatch { index, .. }) => assert_eq!(index, 0),
        other => panic!("expected schema mismatch, got {:?}", other),
    }
}

#[test]
fn test_static_source_through_trait_object() {
    let source: Box<dyn RecordSource> = Box::new(StaticSource::new(vec![
        tree_health::parser::CountRecord::new("Manhattan", "honeylocust", Health::Good, 9),
    ]));

    let query = CountQuery::new(Borough::Manhattan, PipelineMode::Simple, 10);
    let records = source.fetch(&query).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, "honeylocust");
}

#[test]
fn test_schema_mismatch_is_not_unavailable() {
    let err = ProviderError::SchemaMismatch {
        index: 3,
        reason: "missing 'health' column".to_string(),
    };
    assert!(!err.is_unavailable());
    assert!(err.to_string().contains("record 3"));
}
