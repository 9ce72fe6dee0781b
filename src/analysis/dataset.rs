use chrono::{DateTime, Datelike};
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{Dataset, RepositoryRecord, Selection, SummaryRow};

/// The ranked dataset of a run together with the rows shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Every repository, sorted descending by the selected feature
    pub dataset: Dataset,
    /// The first `selection.rows` rows of `dataset`
    pub head: Vec<SummaryRow>,
}

/// Two-digit creation year of an RFC 3339 timestamp (`2011-...` becomes `"11"`).
///
/// Years outside 2000..=2099 are still truncated but logged, since the
/// two-digit form cannot tell centuries apart.
pub fn year_creation(created_at: &str) -> Result<String> {
    let year = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| Error::Schema(format!("invalid created_at '{created_at}': {e}")))?
        .year();

    if !(2000..=2099).contains(&year) {
        warn!(year, created_at, "creation year outside 2000-2099 is ambiguous as two digits");
    }
    Ok(format!("{:02}", year.rem_euclid(100)))
}

/// Rename a raw record onto the summary columns.
pub fn summarize(record: &RepositoryRecord, selection: &Selection) -> Result<SummaryRow> {
    Ok(SummaryRow {
        repo_name: record.name.clone(),
        description: record.description.clone(),
        url: record.url.clone(),
        year_creation: year_creation(&record.created_at)?,
        value: record.feature_value(selection.feature),
    })
}

/// Sort rows descending by value, keeping API rank among equal values.
pub fn rank_descending(rows: &mut [SummaryRow]) {
    // sort_by is stable
    rows.sort_by(|a, b| b.value.cmp(&a.value));
}

/// Project, rank and truncate the fetched repositories.
pub fn build_dataset(records: &[RepositoryRecord], selection: &Selection) -> Result<Summary> {
    let mut rows = records
        .iter()
        .map(|record| summarize(record, selection))
        .collect::<Result<Vec<_>>>()?;

    rank_descending(&mut rows);

    let head_len = selection.rows.get().min(rows.len());
    let head = rows[..head_len].to_vec();

    Ok(Summary {
        dataset: Dataset {
            feature: selection.feature,
            rows,
        },
        head,
    })
}
