//! Record sources: the seam between the pipeline and the data provider.

use super::types::CountQuery;
use crate::parser::{parse_records, CountRecord};
use crate::utils::error::ProviderError;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Anything that can answer a grouped-count query
pub trait RecordSource {
    /// Records for one borough with non-null health (and steward, in faceted mode)
    fn fetch(&self, query: &CountQuery) -> Result<Vec<CountRecord>, ProviderError>;

    /// Short human-readable origin, for logs
    fn describe(&self) -> String;
}

/// In-memory records, filtered and shaped like a provider response
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<CountRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<CountRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for StaticSource {
    fn fetch(&self, query: &CountQuery) -> Result<Vec<CountRecord>, ProviderError> {
        Ok(select_for_query(self.records.iter().cloned(), query))
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}

/// A saved SODA response on disk
///
/// The file may hold rows for several boroughs; they are narrowed to the
/// queried one. Rows must carry a `steward` column for faceted queries.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RecordSource for FileSource {
    fn fetch(&self, query: &CountQuery) -> Result<Vec<CountRecord>, ProviderError> {
        info!("Reading saved response: {}", self.path.display());

        let contents = fs::read_to_string(&self.path)?;
        let raw: Value = serde_json::from_str(&contents)
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON: {}", e)))?;

        let records = parse_records(&raw, query.mode)?;
        let selected = select_for_query(records, query);

        debug!(
            "{} records for {} after filtering",
            selected.len(),
            query.borough
        );
        Ok(selected)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Apply the query's borough/steward filter to locally held records
fn select_for_query(
    records: impl IntoIterator<Item = CountRecord>,
    query: &CountQuery,
) -> Vec<CountRecord> {
    let faceted = query.mode.uses_sub_dimension();

    records
        .into_iter()
        .filter(|r| r.region == query.borough.label())
        .filter(|r| !faceted || r.sub_dimension.is_some())
        .map(|mut r| {
            if !faceted {
                r.sub_dimension = None;
            }
            r
        })
        .take(query.limit)
        .collect()
}
