//! Configuration and constants for the dashboard.

use crate::parser::schema::Borough;
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Street Tree Census (2015) SODA resource
pub const DEFAULT_ENDPOINT: &str = "https://data.cityofnewyork.us/resource/nwxe-4ae8.json";

/// Default timeout for provider requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Current chart spec schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of species kept in each chart
pub const DEFAULT_TOP_N: usize = 10;
pub const MAX_TOP_N: usize = 100;

/// Facet columns per row in the steward chart
pub const DEFAULT_FACET_WRAP: usize = 4;

// Pixel sizes used by the original dashboard layout
pub const DEFAULT_CHART_HEIGHT: u32 = 400;
pub const DEFAULT_CHART_WIDTH: u32 = 800;

// SODA silently pages at 1000 rows unless $limit is given
pub const DEFAULT_ROW_LIMIT: usize = 50_000;

// Column names returned by the census endpoint
pub const REGION_FIELD: &str = "boroname";
pub const CATEGORY_FIELD: &str = "spc_common";
pub const SUB_DIMENSION_FIELD: &str = "steward";
pub const STATUS_FIELD: &str = "health";
pub const COUNT_FIELD: &str = "count_tree_id";

/// Immutable dashboard configuration, passed explicitly to every handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// SODA resource URL
    pub endpoint: String,

    /// Optional Socrata application token (sent as X-App-Token)
    pub app_token: Option<String>,

    /// Number of top species per chart
    pub top_n: usize,

    /// Facet columns per row for the steward chart
    pub facet_wrap: usize,

    /// Chart height in pixels
    pub height: u32,

    /// Simple chart width in pixels
    pub width: u32,

    /// Maximum rows requested from the provider
    pub row_limit: usize,

    /// Region shown when none is selected
    pub default_borough: Borough,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_token: None,
            top_n: DEFAULT_TOP_N,
            facet_wrap: DEFAULT_FACET_WRAP,
            height: DEFAULT_CHART_HEIGHT,
            width: DEFAULT_CHART_WIDTH,
            row_limit: DEFAULT_ROW_LIMIT,
            default_borough: Borough::Bronx,
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Check value ranges after loading or overriding
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "endpoint must start with http:// or https:// (got {})",
                self.endpoint
            )));
        }

        if self.top_n == 0 || self.top_n > MAX_TOP_N {
            return Err(ConfigError::Invalid(format!(
                "top_n must be between 1 and {} (got {})",
                MAX_TOP_N, self.top_n
            )));
        }

        if self.facet_wrap == 0 {
            return Err(ConfigError::Invalid("facet_wrap must be at least 1".to_string()));
        }

        if self.height == 0 || self.width == 0 {
            return Err(ConfigError::Invalid("chart dimensions must be non-zero".to_string()));
        }

        if self.row_limit == 0 {
            return Err(ConfigError::Invalid("row_limit must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Load a dashboard configuration from a TOML file
///
/// Missing keys fall back to the defaults above.
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Parse` - If TOML is invalid
/// * `ConfigError::Invalid` - If a value is out of range
///
/// # Example
/// ```ignore
/// let config = load_config("dashboard.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DashboardConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading dashboard config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: DashboardConfig = toml::from_str(&contents)?;
    config.validate()?;

    Ok(config)
}
