//! Popular Repository Statistics
//!
//! Command-line entry point: loads the layered configuration, runs the
//! analysis and prints the ranked table.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use repostats::analysis::render_table;
use repostats::config::{self, AnalysisConfig, SYSTEM_CONFIG_PATH, USER_CONFIG_PATH};
use repostats::logging::{init_logging, DEFAULT_LOG_FILE};
use repostats::Pipeline;

#[derive(Debug, Parser)]
#[command(name = "repostats", version, about)]
struct Cli {
    /// Job-specific configuration file
    #[arg(default_value = config::DEFAULT_ANALYSIS_CONFIG_PATH)]
    config: PathBuf,

    /// System-wide defaults, read first
    #[arg(long, default_value = SYSTEM_CONFIG_PATH)]
    system_config: PathBuf,

    /// User overrides, read second
    #[arg(long, default_value = USER_CONFIG_PATH)]
    user_config: PathBuf,

    /// Directory receiving the spreadsheet and the plot
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Append-only log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Skip the completion notification
    #[arg(long)]
    no_notify: bool,

    /// Print the merged configuration before running
    #[arg(long)]
    print_config: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli.log_file) {
        eprintln!("Error: cannot open log file {}: {e}", cli.log_file.display());
        return ExitCode::FAILURE;
    }

    // Reported once through tracing so the line reaches both stderr and the log file.
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = [cli.system_config, cli.user_config, cli.config];
    let config =
        AnalysisConfig::load(&paths).context("analysis halted during configuration stage")?;

    if cli.print_config {
        println!("{config:#?}");
    }

    let mut pipeline = Pipeline::new(config).with_output_dir(cli.output_dir);
    if cli.no_notify {
        pipeline = pipeline.with_notifier(None);
    }

    let report = pipeline.run().map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e).context(format!("analysis halted during {stage} stage"))
    })?;

    let config = pipeline.config();
    print!(
        "{}",
        render_table(&config.title_corp, &config.title_analisys, &report.summary)
    );
    println!(
        " By \"{}\", the MEAN is:{}",
        report.summary.dataset.feature, report.mean
    );
    println!("Spreadsheet: {}", report.spreadsheet.display());
    println!("Plot: {}", report.plot.display());
    Ok(())
}
