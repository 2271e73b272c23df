//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses the CLI argument
//! - runs the computation pipeline
//! - prints the rebate summary
//! - renders the charts

use std::path::Path;

use clap::Parser;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::domain::RebateConfig;
use crate::error::{AppError, EXIT_RENDER, EXIT_USAGE};

pub mod pipeline;

/// Entry point for the `rebate` binary.
pub fn run() -> Result<(), AppError> {
    crate::logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help/version go to stdout, argument errors to stderr.
            let _ = err.print();
            return match crate::cli::exit_code_for(&err) {
                0 => Ok(()),
                code => Err(AppError::new(code, "")),
            };
        }
    };
    let Some(csv_path) = cli.csv else {
        println!("{}", crate::cli::usage());
        return Err(AppError::new(EXIT_USAGE, ""));
    };

    run_with_config(&csv_path, &RebateConfig::default())
}

/// Run one report for `csv_path`.
///
/// The summary is printed before any chart is drawn, so a rendering failure
/// never hides the billing result. If any chart fails the run still ends with
/// exit code 4.
pub fn run_with_config(csv_path: &Path, config: &RebateConfig) -> Result<(), AppError> {
    let report = pipeline::run_report(csv_path, config)?;

    if let Some(note) = crate::report::format_ingest_note(&report.ingest_stats) {
        info!("{note}");
    }

    println!("{}", crate::report::format_summary(&report.analysis.rebate, config));

    let outcome = crate::plot::render_all(&report.samples, &report.analysis.buckets, config);
    if outcome.is_complete() {
        return Ok(());
    }

    let failed: Vec<String> = outcome.failures.iter().map(ToString::to_string).collect();
    warn!(failed = failed.len(), "some charts were not written");
    Err(AppError::new(
        EXIT_RENDER,
        format!("Error: chart rendering failed:\n  {}", failed.join("\n  ")),
    ))
}
