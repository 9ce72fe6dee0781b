//! # Common Types
//!
//! This module contains the common types used throughout the application for
//! representing search results, the validated column selection and the ranked
//! dataset that the reporting and plotting stages consume.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// A repository exactly as returned by the search API.
///
/// Only the fields the analysis needs are decoded; anything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryRecord {
    /// Repository name (without owner)
    pub name: String,
    /// Free-text description, absent for some repositories
    pub description: Option<String>,
    /// API url of the repository
    pub url: String,
    /// ISO-8601 creation timestamp
    pub created_at: String,
    /// Watcher count
    pub watchers_count: u64,
    /// Repository size as reported by the API
    pub size: u64,
    /// Fork count
    pub forks_count: u64,
    /// Whether GitHub projects are enabled
    #[serde(default)]
    pub has_projects: bool,
    /// Open issue count
    pub open_issues_count: u64,
}

impl RepositoryRecord {
    /// Value of the given feature column for this repository.
    pub fn feature_value(&self, feature: Feature) -> u64 {
        match feature {
            Feature::WatchersQty => self.watchers_count,
            Feature::SizeInBytes => self.size,
            Feature::ForksQty => self.forks_count,
            Feature::OpenIssuesQty => self.open_issues_count,
        }
    }
}

/// The repository attributes that can be ranked, reported and plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    WatchersQty,
    SizeInBytes,
    ForksQty,
    OpenIssuesQty,
}

impl Feature {
    /// Every selectable feature, in the order they are documented.
    pub const ALL: [Feature; 4] = [
        Feature::WatchersQty,
        Feature::SizeInBytes,
        Feature::ForksQty,
        Feature::OpenIssuesQty,
    ];

    /// Canonical column name used in configuration, tables and file names.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::WatchersQty => "Watchers_Qty",
            Feature::SizeInBytes => "Size_in_Bytes",
            Feature::ForksQty => "Forks_Qty",
            Feature::OpenIssuesQty => "Open_Issues_Qty",
        }
    }

}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.column_name() == s)
            .ok_or_else(|| Error::InvalidFeature(s.to_string()))
    }
}

/// A validated choice of feature and number of displayed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub feature: Feature,
    pub rows: NonZeroUsize,
}

impl Selection {
    /// Validate the raw configuration values for feature and row count.
    ///
    /// The feature is checked first, so a run with both values wrong reports
    /// the feature.
    pub fn parse(feature: &str, rows: &str) -> Result<Self> {
        let feature = feature.parse::<Feature>()?;
        let rows = rows
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|n| usize::try_from(n).ok())
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| Error::InvalidRowCount(rows.to_string()))?;
        Ok(Self { feature, rows })
    }
}

/// A repository renamed and projected onto the reported columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// `Repo_Name`
    pub repo_name: String,
    /// `Description`
    pub description: Option<String>,
    /// `url`
    pub url: String,
    /// `Year_Creation`, two digits (`"11"` for 2011)
    pub year_creation: String,
    /// Value of the selected feature
    pub value: u64,
}

/// Fixed column headers of a summary row, after the feature column.
pub const SUMMARY_COLUMNS: [&str; 4] = ["Repo_Name", "Description", "url", "Year_Creation"];

/// Every repository of one run, ranked by the selected feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// The feature the rows are ranked by
    pub feature: Feature,
    /// Rows sorted descending by `value`
    pub rows: Vec<SummaryRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column headers in export order, led by the feature.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = vec![self.feature.column_name()];
        columns.extend(SUMMARY_COLUMNS);
        columns
    }

    /// Rows ordered ascending by creation year. Ties keep their ranking order.
    pub fn sorted_by_year(&self) -> Vec<SummaryRow> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| a.year_creation.cmp(&b.year_creation));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_round_trips_through_column_name() {
        for feature in Feature::ALL {
            assert_eq!(feature.column_name().parse::<Feature>().unwrap(), feature);
        }
    }

    #[test]
    fn test_feature_rejects_raw_field_names() {
        let err = "watchers_count".parse::<Feature>().unwrap_err();
        assert!(matches!(err, Error::InvalidFeature(ref v) if v == "watchers_count"));
    }

    #[test]
    fn test_selection_parse() {
        let selection = Selection::parse("Forks_Qty", "10").unwrap();
        assert_eq!(selection.feature, Feature::ForksQty);
        assert_eq!(selection.rows.get(), 10);

        assert!(matches!(
            Selection::parse("Stars", "10"),
            Err(Error::InvalidFeature(_))
        ));
        for bad in ["0", "-1", "ten", "2.5", ""] {
            assert!(
                matches!(Selection::parse("Forks_Qty", bad), Err(Error::InvalidRowCount(ref v)) if v == bad),
                "row count {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_columns_lead_with_feature() {
        let dataset = Dataset {
            feature: Feature::OpenIssuesQty,
            rows: Vec::new(),
        };
        assert_eq!(
            dataset.columns(),
            ["Open_Issues_Qty", "Repo_Name", "Description", "url", "Year_Creation"]
        );
    }

    #[test]
    fn test_sorted_by_year_is_stable() {
        let row = |name: &str, year: &str, value: u64| SummaryRow {
            repo_name: name.to_string(),
            description: None,
            url: format!("https://api.github.com/repos/x/{name}"),
            year_creation: year.to_string(),
            value,
        };
        let dataset = Dataset {
            feature: Feature::WatchersQty,
            rows: vec![row("a", "15", 9), row("b", "11", 8), row("c", "15", 7), row("d", "11", 6)],
        };

        let names: Vec<_> = dataset
            .sorted_by_year()
            .into_iter()
            .map(|r| r.repo_name)
            .collect();
        assert_eq!(names, ["b", "d", "a", "c"]);
        // ranking order is untouched
        assert_eq!(dataset.rows[0].repo_name, "a");
    }
}
