use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::styles::{parse_color, ChartStyle, ChartTheme};
use crate::error::{Error, Result};
use crate::types::{Dataset, Feature, SummaryRow};

type PlotError = Box<dyn StdError + Send + Sync>;

/// X axis caption; creation years are drawn as their last two digits.
pub const X_AXIS_LABEL: &str = "Year Repos Creation 20XX";

// Helper function to wrap errors
fn wrap_err<E>(e: E) -> PlotError
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    e.into()
}

/// File name of the scatter plot for a feature.
pub fn plot_file_name(feature: Feature) -> String {
    format!("repos_{}_by_year_creation.png", feature.column_name())
}

/// Chart title for a feature.
pub fn plot_title(feature: Feature) -> String {
    format!("Repo {} x Year Creation", feature.column_name())
}

/// Plot the dataset by creation year and save it to `<dir>/repos_<feature>_by_year_creation.png`.
pub fn plot_by_year(dataset: &Dataset, color: &str, dir: &Path) -> Result<PathBuf> {
    let color = parse_color(color)?;
    let path = dir.join(plot_file_name(dataset.feature));
    let rows = dataset.sorted_by_year();

    render_scatter(&rows, dataset.feature, color, &path)
        .map_err(|e| Error::Plot(e.to_string()))?;

    info!(path = %path.display(), points = rows.len(), "saved scatter plot");
    Ok(path)
}

fn render_scatter(
    rows: &[SummaryRow],
    feature: Feature,
    color: RGBColor,
    path: &Path,
) -> std::result::Result<(), PlotError> {
    let style = ChartStyle::default();
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    draw_scatter(rows, feature, color, &style, &root)?;
    root.present().map_err(wrap_err)?;
    Ok(())
}

/// Points of the scatter: (two-digit year, feature value).
pub fn scatter_points(rows: &[SummaryRow]) -> Vec<(f64, f64)> {
    rows.iter()
        .filter_map(|row| {
            row.year_creation
                .parse::<u32>()
                .ok()
                .map(|year| (year as f64, row.value as f64))
        })
        .collect()
}

/// Axis ranges that keep every point inside the plot area.
pub fn axis_ranges(points: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
    if points.is_empty() {
        return ((0.0, 1.0), (0.0, 1.0));
    }
    let (x_min, x_max) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)));
    let y_max = points.iter().map(|&(_, y)| y).fold(0.0, f64::max);

    ((x_min - 1.0, x_max + 1.0), (0.0, (y_max * 1.1).max(1.0)))
}

fn draw_scatter(
    rows: &[SummaryRow],
    feature: Feature,
    color: RGBColor,
    style: &ChartStyle,
    root_area: &DrawingArea<BitMapBackend, Shift>,
) -> std::result::Result<(), PlotError> {
    let theme = ChartTheme::default();
    root_area.fill(&theme.background_color).map_err(wrap_err)?;

    let points = scatter_points(rows);
    let ((x_min, x_max), (y_min, y_max)) = axis_ranges(&points);

    let mut chart = ChartBuilder::on(root_area)
        .caption(
            plot_title(feature),
            ("sans-serif", style.title_font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .margin(style.margin)
        .x_label_area_size(style.label_area_size)
        .y_label_area_size(style.label_area_size + 20)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .x_desc(X_AXIS_LABEL)
        .y_desc(feature.column_name())
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .x_label_formatter(&|x| format!("{:02}", x.round() as i64))
        // Use K/M formatting for large numbers
        .y_label_formatter(&|y| {
            if y.abs() >= 1_000_000.0 {
                format!("{:.1}M", y / 1_000_000.0)
            } else if y.abs() >= 1_000.0 {
                format!("{:.1}K", y / 1_000.0)
            } else {
                format!("{:.0}", y)
            }
        })
        .draw()?;

    draw_points(&mut chart, &points, color, style.marker_size)?;
    Ok(())
}

fn draw_points(
    chart: &mut ChartContext<BitMapBackend, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: &[(f64, f64)],
    color: RGBColor,
    marker_size: u32,
) -> std::result::Result<(), PlotError> {
    chart
        .draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, marker_size, color.filled())),
        )
        .map_err(wrap_err)?;
    Ok(())
}
