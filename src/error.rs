//! # Errors
//!
//! One error type covers every stage of an analysis run. Each variant belongs to
//! exactly one stage so the binary can tell the user where the run halted.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Library-wide error type for repostats operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration layer could not be read.
    #[error("configuration file not found or unreadable: {}", path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration layer is not a YAML mapping.
    #[error("failed to parse configuration file {}: {details}", path.display())]
    ConfigParse { path: PathBuf, details: String },

    /// A required key is absent from the merged configuration.
    #[error("required configuration key '{0}' is missing")]
    MissingConfigKey(String),

    /// The search request never produced a response.
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The search API answered with a non-success status.
    #[error("search API returned status {status}")]
    Fetch { status: u16 },

    /// The search API response does not have the expected shape.
    #[error("unexpected search API response: {0}")]
    Schema(String),

    /// The selected feature is not one of the analysable columns.
    #[error(
        "feature '{0}' is not one of the options to be calculated \
         (Watchers_Qty, Size_in_Bytes, Forks_Qty, Open_Issues_Qty)"
    )]
    InvalidFeature(String),

    /// The requested number of lines is not a positive integer.
    #[error("number of lines '{0}' is not a positive integer")]
    InvalidRowCount(String),

    /// A statistic was requested over no rows.
    #[error("cannot compute a mean over an empty dataset")]
    EmptyDataset,

    /// The spreadsheet writer failed.
    #[error("failed to write spreadsheet: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The configured plot colour could not be understood.
    #[error("unknown plot colour '{0}'")]
    InvalidColor(String),

    /// The chart backend failed to draw or save.
    #[error("failed to render plot: {0}")]
    Plot(String),
}

impl Error {
    /// Name of the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::ConfigNotFound { .. } | Error::ConfigParse { .. } | Error::MissingConfigKey(_) => {
                "configuration"
            }
            Error::Request(_) | Error::Fetch { .. } | Error::Schema(_) => "fetch",
            Error::InvalidFeature(_) | Error::InvalidRowCount(_) => "validation",
            Error::EmptyDataset | Error::Export(_) | Error::Io(_) => "report",
            Error::InvalidColor(_) | Error::Plot(_) => "plot",
        }
    }
}
