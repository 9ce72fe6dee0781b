//! The analysis run, stage by stage.
//!
//! Each stage takes the previous stage's output and returns its own; nothing is
//! carried between calls except through those values. The run is strictly
//! linear: the first error halts it, except for the final notification which
//! is best-effort.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::analysis::{self, Summary};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::fetch::RepositoryFetcher;
use crate::notify::Notifier;
use crate::plotting;
use crate::types::{RepositoryRecord, Selection};

/// Points of progress through a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing validated or fetched yet
    Idle,
    Configured,
    Fetched,
    Built,
    Reported,
    Plotted,
    Notified,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Configured => "configured",
            Stage::Fetched => "fetched",
            Stage::Built => "built",
            Stage::Reported => "reported",
            Stage::Plotted => "plotted",
            Stage::Notified => "notified",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: Summary,
    pub mean: f64,
    pub spreadsheet: PathBuf,
    pub plot: PathBuf,
    /// `None` when notification was disabled
    pub notified: Option<bool>,
}

/// Mean and export location produced by the reporting stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub mean: f64,
    pub spreadsheet: PathBuf,
}

/// Validate the selection before any network traffic.
pub fn configure(config: &AnalysisConfig) -> Result<Selection> {
    let selection = Selection::parse(&config.selected_feature, &config.selected_number_lines)?;
    debug!(stage = %Stage::Configured, feature = %selection.feature, rows = selection.rows.get());
    Ok(selection)
}

pub fn fetch(fetcher: &RepositoryFetcher) -> Result<Vec<RepositoryRecord>> {
    let records = fetcher.fetch_top_repositories()?;
    debug!(stage = %Stage::Fetched, repositories = records.len());
    Ok(records)
}

pub fn build(records: &[RepositoryRecord], selection: &Selection) -> Result<Summary> {
    let summary = analysis::build_dataset(records, selection)?;
    debug!(stage = %Stage::Built, rows = summary.dataset.len(), head = summary.head.len());
    Ok(summary)
}

pub fn report(summary: &Summary, output_dir: &Path) -> Result<Report> {
    let mean = analysis::report_mean(&summary.dataset)?;
    let spreadsheet = analysis::export_spreadsheet(&summary.dataset, output_dir)?;
    debug!(stage = %Stage::Reported, mean);
    Ok(Report { mean, spreadsheet })
}

pub fn plot(summary: &Summary, color: &str, output_dir: &Path) -> Result<PathBuf> {
    let path = plotting::plot_by_year(&summary.dataset, color, output_dir)?;
    debug!(stage = %Stage::Plotted, path = %path.display());
    Ok(path)
}

pub fn notify(notifier: &Notifier) -> bool {
    let delivered = notifier.notify_done();
    debug!(stage = %Stage::Notified, delivered);
    delivered
}

/// A configured analysis run and its collaborators.
#[derive(Debug)]
pub struct Pipeline {
    config: AnalysisConfig,
    fetcher: RepositoryFetcher,
    notifier: Option<Notifier>,
    output_dir: PathBuf,
}

impl Pipeline {
    /// Run against the public API, writing into the working directory.
    pub fn new(config: AnalysisConfig) -> Self {
        let fetcher = RepositoryFetcher::new(config.token.clone());
        Self {
            config,
            fetcher,
            notifier: Some(Notifier::new()),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_fetcher(mut self, fetcher: RepositoryFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replace the notifier; `None` skips the notification stage.
    pub fn with_notifier(mut self, notifier: Option<Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run every stage in order.
    pub fn run(&self) -> Result<RunReport> {
        debug!(stage = %Stage::Idle, output_dir = %self.output_dir.display(), "starting run");
        let selection = configure(&self.config)?;
        let records = fetch(&self.fetcher)?;
        let summary = build(&records, &selection)?;
        let Report { mean, spreadsheet } = report(&summary, &self.output_dir)?;
        let plot_path = plot(&summary, &self.config.plot_color, &self.output_dir)?;
        let notified = self.notifier.as_ref().map(notify);

        info!(stage = %Stage::Done, feature = %selection.feature, "analysis complete");
        Ok(RunReport {
            summary,
            mean,
            spreadsheet,
            plot: plot_path,
            notified,
        })
    }
}
