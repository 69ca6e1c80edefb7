//! Parsing of provider responses into typed census records.

pub mod records;
pub mod schema;

// Re-export main types and functions
pub use records::parse_records;
pub use schema::{
    Borough, CountRecord, GroupKey, Health, HealthLabel, NormalizedRow, PipelineMode,
    PivotedGroup, RankedSelection, StatusCounts,
};
