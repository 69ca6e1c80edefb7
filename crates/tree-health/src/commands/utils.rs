use crate::output::read_chart_spec;
use crate::parser::schema::Borough;
use crate::utils::config::{
    DashboardConfig, CATEGORY_FIELD, COUNT_FIELD, REGION_FIELD, SCHEMA_VERSION, STATUS_FIELD,
    SUB_DIMENSION_FIELD,
};
use anyhow::Result;
use std::path::PathBuf;

/// Validate a chart spec JSON file
pub fn validate_chart_file(file_path: PathBuf) -> Result<()> {
    println!("Validating chart spec: {}", file_path.display());

    let spec = read_chart_spec(&file_path)?;

    println!("✓ Valid chart spec JSON");
    println!("  Version: {}", spec.version);
    println!("  Title: {}", spec.title);
    println!("  Borough: {}", spec.borough);
    println!("  Species: {}", spec.category_order.len());
    println!("  Rows: {}", spec.data.len());
    if let Some(facet) = &spec.facet {
        println!("  Facets: {} ({} per row)", spec.facets().len(), facet.columns);
    }

    Ok(())
}

/// List the region selector options
pub fn display_boroughs(config: &DashboardConfig) {
    println!("Select a borough:");
    for borough in Borough::ALL {
        let marker = if borough == config.default_borough { "*" } else { " " };
        println!("  {} {}", marker, borough);
    }
}

/// Display chart spec schema information
pub fn display_schema(show_details: bool) {
    println!("Tree Health Chart Spec Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    println!("Census fields:");
    for (role, field) in census_fields() {
        println!("  {:<14} {}", role, field);
    }
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  title: string            - Chart title");
        println!("  borough: string          - Selected borough");
        println!("  mode: string             - 'simple' or 'faceted'");
        println!("  mark: string             - Always 'bar'");
        println!("  stacked: bool            - Bars stacked by color field");
        println!("  encoding: object         - x / y / color field names");
        println!("  color_map: array         - Fixed status colors (Poor=red, Fair=yellow, Good=green)");
        println!("  facet: object?           - Facet field and columns per row");
        println!("  category_order: array    - Species in rank order");
        println!("  height: number           - Pixel height");
        println!("  width: number?           - Pixel width");
        println!("  data: array              - Normalized rows");
        println!("    region, category, sub_dimension?, status, count, total, proportion");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Census columns the grouped-count queries select, by role
pub fn census_fields() -> [(&'static str, &'static str); 5] {
    [
        ("region", REGION_FIELD),
        ("category", CATEGORY_FIELD),
        ("sub_dimension", SUB_DIMENSION_FIELD),
        ("status", STATUS_FIELD),
        ("count", COUNT_FIELD),
    ]
}

/// Display version information
pub fn display_version() {
    println!("Tree Health Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Chart Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Top-N species health charts for the NYC Street Tree Census.");
}
