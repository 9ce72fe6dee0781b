use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use statrs::statistics::Statistics;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::{Dataset, Feature, SummaryRow};

use super::Summary;

/// Longest description shown in the console table before eliding.
const DESCRIPTION_WIDTH: usize = 48;

/// Arithmetic mean of the selected feature over every row of the dataset.
pub fn mean(dataset: &Dataset) -> Result<f64> {
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let values: Vec<f64> = dataset.rows.iter().map(|row| row.value as f64).collect();
    Ok(values.iter().mean())
}

/// Compute and log the mean for the run.
pub fn report_mean(dataset: &Dataset) -> Result<f64> {
    let mean = mean(dataset)?;
    info!(
        " By \"{}\", the top 100 most popular repositories MEAN is:{}",
        dataset.feature, mean
    );
    Ok(mean)
}

/// File name of the spreadsheet export for a feature.
pub fn spreadsheet_file_name(feature: Feature) -> String {
    format!("repo_ordered_by_{}.xlsx", feature.column_name())
}

/// Write the whole dataset to `<dir>/repo_ordered_by_<feature>.xlsx`.
///
/// An existing file of the same name is replaced.
pub fn export_spreadsheet(dataset: &Dataset, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(spreadsheet_file_name(dataset.feature));

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in dataset.columns().into_iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &header)?;
    }

    for (i, row) in dataset.rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_number(r, 0, row.value as f64)?;
        sheet.write_string(r, 1, &row.repo_name)?;
        if let Some(description) = &row.description {
            sheet.write_string(r, 2, description)?;
        }
        sheet.write_string(r, 3, &row.url)?;
        sheet.write_string(r, 4, &row.year_creation)?;
    }

    workbook.save(&path)?;
    info!(path = %path.display(), rows = dataset.len(), "exported spreadsheet");
    Ok(path)
}

/// Console rendering of the displayed rows.
pub fn render_table(title_corp: &str, title_analisys: &str, summary: &Summary) -> String {
    let feature = summary.dataset.feature;
    let mut out = format!("{title_corp}. {title_analisys} ordered by {feature}:\n");

    let cells: Vec<[String; 5]> = summary.head.iter().map(table_cells).collect();
    let columns = summary.dataset.columns();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |out: &mut String, values: &[&str]| {
        let rendered: Vec<String> = values
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (value, &width))| {
                if i == 0 {
                    format!("{value:>width$}")
                } else {
                    format!("{value:<width$}")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", rendered.join("  ").trim_end());
    };

    line(&mut out, &columns);
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        line(&mut out, &values);
    }
    out
}

fn table_cells(row: &SummaryRow) -> [String; 5] {
    let description = row.description.as_deref().unwrap_or("None");
    let description = if description.chars().count() > DESCRIPTION_WIDTH {
        let cut: String = description.chars().take(DESCRIPTION_WIDTH - 3).collect();
        format!("{cut}...")
    } else {
        description.to_string()
    };
    [
        row.value.to_string(),
        row.repo_name.clone(),
        description,
        row.url.clone(),
        row.year_creation.clone(),
    ]
}
