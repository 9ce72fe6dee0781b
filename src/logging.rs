//! Tracing initialization and configuration.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file written next to the exports.
pub const DEFAULT_LOG_FILE: &str = "Log_analysis.log";

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "REPOSTATS_LOG";

#[cfg(feature = "dev")]
const DEFAULT_FILTER: &str = "repostats=debug";
#[cfg(not(feature = "dev"))]
const DEFAULT_FILTER: &str = "repostats=info";

static INIT: Once = Once::new();

/// Initialize logging to stderr and to an append-only log file.
///
/// Reads `REPOSTATS_LOG` for filter directives, e.g. `REPOSTATS_LOG=repostats=debug`,
/// falling back to `repostats=info`.
///
/// Only the first call installs a subscriber; later calls are no-ops.
pub fn init_logging(log_file: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
            .with(filter)
            .try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_log_file_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_LOG_FILE);

        init_logging(&path).unwrap();
        init_logging(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_location() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join(DEFAULT_LOG_FILE);
        assert!(init_logging(&path).is_err());
    }
}
