//! Declarative chart document handed to the renderer.
//!
//! Field names in `encoding` and `facet` refer to `NormalizedRow` fields.

use crate::parser::schema::{Borough, Health, NormalizedRow, PipelineMode};
use serde::{Deserialize, Serialize};

/// Complete stacked/faceted bar chart description with inline data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Schema version
    pub version: String,

    pub title: String,
    pub borough: Borough,
    pub mode: PipelineMode,

    /// Mark type, always "bar"
    pub mark: String,

    /// Bars are stacked by the color field
    pub stacked: bool,

    pub encoding: Encoding,

    /// Status -> color, fixed across all charts
    pub color_map: Vec<ColorAssignment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet: Option<FacetSpec>,

    /// Species in rank order (x-axis order, or facet order)
    pub category_order: Vec<String>,

    /// Pixel height
    pub height: u32,

    /// Pixel width (renderer decides when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    pub data: Vec<NormalizedRow>,

    /// ISO 8601 timestamp
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoding {
    pub x: String,
    pub y: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorAssignment {
    pub status: Health,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSpec {
    pub field: String,

    /// Facet columns per row
    pub columns: usize,
}

/// Rows of one facet (one species)
#[derive(Debug, Clone)]
pub struct Facet<'a> {
    pub category: &'a str,
    pub rows: Vec<&'a NormalizedRow>,
}

impl<'a> Facet<'a> {
    /// Distinct x values (stewardship levels) in first-appearance order
    pub fn x_values(&self) -> Vec<&'a str> {
        let mut values: Vec<&'a str> = Vec::new();
        for row in self.rows.iter().copied() {
            let value = row.sub_dimension.as_deref().unwrap_or("");
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values
    }
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_faceted(&self) -> bool {
        self.facet.is_some()
    }

    /// Color for a status, falling back to the fixed assignment
    pub fn color_for(&self, status: Health) -> &str {
        self.color_map
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.color.as_str())
            .unwrap_or_else(|| status.color())
    }

    /// One facet per ranked species; empty for non-faceted charts
    pub fn facets(&self) -> Vec<Facet<'_>> {
        if !self.is_faceted() {
            return Vec::new();
        }

        self.category_order
            .iter()
            .map(|category| Facet {
                category: category.as_str(),
                rows: self
                    .data
                    .iter()
                    .filter(|row| &row.category == category)
                    .collect(),
            })
            .collect()
    }

    /// Rows for one species, all stewardship levels included
    pub fn rows_for<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a NormalizedRow> + 'a {
        self.data.iter().filter(move |row| row.category == category)
    }
}
