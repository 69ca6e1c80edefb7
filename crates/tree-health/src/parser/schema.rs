//! Typed records for the tree census pipeline.
//!
//! Replaces stringly-typed column access with one struct per stage:
//! `CountRecord` (provider rows) -> `PivotedGroup` -> `NormalizedRow`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// NYC boroughs offered by the region selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Borough {
    Bronx,
    Brooklyn,
    Manhattan,
    Queens,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Borough {
    pub const ALL: [Borough; 5] = [
        Borough::Bronx,
        Borough::Brooklyn,
        Borough::Manhattan,
        Borough::Queens,
        Borough::StatenIsland,
    ];

    /// Label as stored in the `boroname` column
    pub fn label(&self) -> &'static str {
        match self {
            Borough::Bronx => "Bronx",
            Borough::Brooklyn => "Brooklyn",
            Borough::Manhattan => "Manhattan",
            Borough::Queens => "Queens",
            Borough::StatenIsland => "Staten Island",
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Borough {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "bronx" => Ok(Borough::Bronx),
            "brooklyn" => Ok(Borough::Brooklyn),
            "manhattan" => Ok(Borough::Manhattan),
            "queens" => Ok(Borough::Queens),
            "statenisland" => Ok(Borough::StatenIsland),
            _ => Err(format!(
                "unknown borough '{}' (expected one of: {})",
                s,
                Borough::ALL.map(|b| b.label()).join(", ")
            )),
        }
    }
}

/// The fixed status set used as pivot columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Health {
    Fair,
    Good,
    Poor,
}

impl Health {
    /// Pivot column order
    pub const ALL: [Health; 3] = [Health::Fair, Health::Good, Health::Poor];

    pub fn label(&self) -> &'static str {
        match self {
            Health::Fair => "Fair",
            Health::Good => "Good",
            Health::Poor => "Poor",
        }
    }

    /// Fixed colour assignment shared by every chart
    pub fn color(&self) -> &'static str {
        match self {
            Health::Poor => "red",
            Health::Fair => "yellow",
            Health::Good => "green",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Fair" => Some(Health::Fair),
            "Good" => Some(Health::Good),
            "Poor" => Some(Health::Poor),
            _ => None,
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status label as delivered by the provider
///
/// Labels outside the fixed set are kept so the pivot can account for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HealthLabel {
    Known(Health),
    Unrecognized(String),
}

impl HealthLabel {
    pub fn known(&self) -> Option<Health> {
        match self {
            HealthLabel::Known(health) => Some(*health),
            HealthLabel::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HealthLabel::Known(health) => health.label(),
            HealthLabel::Unrecognized(label) => label,
        }
    }
}

impl From<&str> for HealthLabel {
    fn from(label: &str) -> Self {
        match Health::from_label(label) {
            Some(health) => HealthLabel::Known(health),
            None => HealthLabel::Unrecognized(label.to_string()),
        }
    }
}

impl From<Health> for HealthLabel {
    fn from(health: Health) -> Self {
        HealthLabel::Known(health)
    }
}

/// One pre-aggregated row from the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRecord {
    pub region: String,
    pub category: String,
    pub sub_dimension: Option<String>,
    pub status: HealthLabel,
    pub count: u64,
}

impl CountRecord {
    pub fn new(
        region: impl Into<String>,
        category: impl Into<String>,
        status: impl Into<HealthLabel>,
        count: u64,
    ) -> Self {
        Self {
            region: region.into(),
            category: category.into(),
            sub_dimension: None,
            status: status.into(),
            count,
        }
    }

    pub fn with_sub_dimension(mut self, sub_dimension: impl Into<String>) -> Self {
        self.sub_dimension = Some(sub_dimension.into());
        self
    }

    /// Grouping key: every dimension except status
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            region: self.region.clone(),
            category: self.category.clone(),
            sub_dimension: self.sub_dimension.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub region: String,
    pub category: String,
    pub sub_dimension: Option<String>,
}

/// Counts for each status of the fixed set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub fair: u64,
    pub good: u64,
    pub poor: u64,
}

impl StatusCounts {
    pub fn get(&self, health: Health) -> u64 {
        match health {
            Health::Fair => self.fair,
            Health::Good => self.good,
            Health::Poor => self.poor,
        }
    }

    pub fn add(&mut self, health: Health, count: u64) {
        let slot = match health {
            Health::Fair => &mut self.fair,
            Health::Good => &mut self.good,
            Health::Poor => &mut self.poor,
        };
        *slot = slot.saturating_add(count);
    }

    pub fn total(&self) -> u64 {
        Health::ALL
            .iter()
            .map(|h| self.get(*h))
            .fold(0u64, u64::saturating_add)
    }
}

/// A group with the status set pivoted into columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotedGroup {
    pub key: GroupKey,
    pub counts: StatusCounts,

    /// Sum over the fixed status set only
    pub total: u64,

    /// Counts carried by status labels outside the fixed set (excluded from total)
    pub dropped: u64,
}

/// The top-N categories, highest total first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSelection {
    pub categories: Vec<String>,
}

impl RankedSelection {
    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Chart-ready row: one per selected group and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub region: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_dimension: Option<String>,
    pub status: Health,
    pub count: u64,
    pub total: u64,
    pub proportion: f64,
}

/// Grouping variant of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// Group by region and species; one stacked bar chart
    Simple,
    /// Group by region, species and steward; one facet per species
    Faceted,
}

impl PipelineMode {
    pub fn uses_sub_dimension(&self) -> bool {
        matches!(self, PipelineMode::Faceted)
    }
}
