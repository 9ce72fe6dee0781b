//! # Popular Repository Statistics
//!
//! `repostats` ranks the 100 most-starred GitHub repositories by one metric,
//! reports the mean of that metric, exports the ranking to a spreadsheet and
//! plots the metric against the year each repository was created.
//!
//! ## Features
//!
//! - Layered YAML configuration (system, user and job files)
//! - Authenticated GitHub search API request
//! - Ranking by watchers, size, forks or open issues
//! - Spreadsheet export of the ranked table
//! - Scatter plot of the metric by creation year
//! - Best-effort push notification when the run completes
//!
//! ## Example
//!
//! ```no_run
//! use repostats::{config, AnalysisConfig, Pipeline};
//!
//! let paths = config::default_layer_paths("configs/analysis_config.yml");
//! let config = AnalysisConfig::load(&paths)?;
//! let report = Pipeline::new(config).with_output_dir(".").run()?;
//! println!("mean: {}", report.mean);
//! # Ok::<(), repostats::Error>(())
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod notify;
pub mod pipeline;
pub mod plotting;
pub mod types;

// Re-export main types for convenience
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use fetch::RepositoryFetcher;
pub use notify::Notifier;
pub use pipeline::{Pipeline, RunReport};
pub use types::{Dataset, Feature, RepositoryRecord, Selection, SummaryRow};
