//! Validation of raw provider JSON into typed count records.
//!
//! SODA returns a JSON array of flat objects. Null columns are omitted from
//! the object entirely, and aggregate columns such as `count_tree_id` arrive
//! as strings.

use super::schema::{CountRecord, HealthLabel, PipelineMode};
use crate::utils::config::{
    CATEGORY_FIELD, COUNT_FIELD, REGION_FIELD, STATUS_FIELD, SUB_DIMENSION_FIELD,
};
use crate::utils::error::ProviderError;
use log::{debug, warn};
use serde_json::{Map, Value};

/// Parse a provider response into count records
///
/// **Public** - boundary between the provider and the pipeline
///
/// Rows without a region, species or (in faceted mode) steward cannot be
/// grouped and are skipped. A row without a status or count column is a
/// schema mismatch and fails the whole response.
///
/// # Errors
/// * `ProviderError::InvalidResponse` - body is not an array, or is a SODA error object
/// * `ProviderError::SchemaMismatch` - a row is missing its status/count or has a bad count
pub fn parse_records(raw: &Value, mode: PipelineMode) -> Result<Vec<CountRecord>, ProviderError> {
    let rows = match raw {
        Value::Array(rows) => rows,
        Value::Object(obj) => {
            let message = obj
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("expected a JSON array of records");
            return Err(ProviderError::InvalidResponse(message.to_string()));
        }
        other => {
            return Err(ProviderError::InvalidResponse(format!(
                "expected a JSON array of records, got {}",
                json_type_name(other)
            )))
        }
    };

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for (index, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| ProviderError::SchemaMismatch {
            index,
            reason: format!("expected an object, got {}", json_type_name(row)),
        })?;

        match parse_row(index, obj, mode)? {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} of {} rows with missing grouping columns",
            skipped,
            rows.len()
        );
    }

    debug!("Parsed {} count records ({:?} mode)", records.len(), mode);
    Ok(records)
}

/// Parse a single row; `Ok(None)` when a grouping column is null
fn parse_row(
    index: usize,
    obj: &Map<String, Value>,
    mode: PipelineMode,
) -> Result<Option<CountRecord>, ProviderError> {
    let status = text_field(obj, STATUS_FIELD).ok_or_else(|| ProviderError::SchemaMismatch {
        index,
        reason: format!("missing '{}' column", STATUS_FIELD),
    })?;

    let count = obj
        .get(COUNT_FIELD)
        .ok_or_else(|| ProviderError::SchemaMismatch {
            index,
            reason: format!("missing '{}' column", COUNT_FIELD),
        })
        .and_then(|value| parse_count(index, value))?;

    let (Some(region), Some(category)) = (
        text_field(obj, REGION_FIELD),
        text_field(obj, CATEGORY_FIELD),
    ) else {
        return Ok(None);
    };

    let sub_dimension = if mode.uses_sub_dimension() {
        match text_field(obj, SUB_DIMENSION_FIELD) {
            Some(steward) => Some(steward.to_string()),
            None => return Ok(None),
        }
    } else {
        None
    };

    Ok(Some(CountRecord {
        region: region.to_string(),
        category: category.to_string(),
        sub_dimension,
        status: HealthLabel::from(status),
        count,
    }))
}

/// Counts may be encoded as a JSON number or a decimal string
pub fn parse_count(index: usize, value: &Value) -> Result<u64, ProviderError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| ProviderError::SchemaMismatch {
        index,
        reason: format!("'{}' is not a non-negative integer: {}", COUNT_FIELD, value),
    })
}

fn text_field<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    obj.get(field).and_then(Value::as_str)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
