//! SoQL query construction for the census endpoint.
//!
//! The provider performs the group-by/count and the ordering; the pipeline
//! relies on that ordering for stable tie-breaking.

use crate::parser::schema::{Borough, PipelineMode};

/// A grouped-count query against the Street Tree Census
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    pub borough: Borough,
    pub mode: PipelineMode,
    pub limit: usize,
}

impl CountQuery {
    pub fn new(borough: Borough, mode: PipelineMode, limit: usize) -> Self {
        Self {
            borough,
            mode,
            limit,
        }
    }

    /// Grouping columns, in `$group`/`$order` order
    pub fn group_columns(&self) -> &'static str {
        match self.mode {
            PipelineMode::Simple => "boroname, spc_common, health",
            PipelineMode::Faceted => "boroname, spc_common, steward, health",
        }
    }

    pub fn where_clause(&self) -> String {
        let borough = soql_quote(self.borough.label());
        match self.mode {
            PipelineMode::Simple => format!("boroname = {} AND health IS NOT NULL", borough),
            PipelineMode::Faceted => format!(
                "boroname = {} AND steward IS NOT NULL AND health IS NOT NULL",
                borough
            ),
        }
    }

    /// Query-string parameters for the SODA request
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("$select", format!("{}, count(tree_id)", self.group_columns())),
            ("$where", self.where_clause()),
            ("$group", self.group_columns().to_string()),
            ("$order", self.group_columns().to_string()),
            ("$limit", self.limit.to_string()),
        ]
    }
}

/// Quote a SoQL string literal
fn soql_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_query_params() {
        let query = CountQuery::new(Borough::Bronx, PipelineMode::Simple, 50_000);
        let params = query.to_params();

        assert_eq!(params[0], ("$select", "boroname, spc_common, health, count(tree_id)".to_string()));
        assert_eq!(params[1], ("$where", "boroname = 'Bronx' AND health IS NOT NULL".to_string()));
        assert_eq!(params[2].1, "boroname, spc_common, health");
        assert_eq!(params[4], ("$limit", "50000".to_string()));
    }

    #[test]
    fn test_faceted_query_filters_steward() {
        let query = CountQuery::new(Borough::StatenIsland, PipelineMode::Faceted, 10);
        assert_eq!(
            query.where_clause(),
            "boroname = 'Staten Island' AND steward IS NOT NULL AND health IS NOT NULL"
        );
        assert!(query.group_columns().contains("steward"));
    }

    #[test]
    fn test_soql_quote_escapes() {
        assert_eq!(soql_quote("O'Brien"), "'O''Brien'");
    }
}
