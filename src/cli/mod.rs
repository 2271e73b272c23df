//! Command-line parsing.
//!
//! The surface is a single positional argument. A missing argument is not left
//! to clap's own error path: the caller prints the usage line to stdout and
//! exits with status 1. Any other argument error also exits with status 1, so
//! status 2 stays reserved for bad input files.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::error::EXIT_USAGE;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "rebate",
    version,
    about = "Classify hourly internet stability from a speed-test CSV and compute the billing rebate"
)]
pub struct Cli {
    /// Speed-test CSV export (columns: Created at, Download, Upload, Status).
    #[arg(value_name = "CSV")]
    pub csv: Option<PathBuf>,
}

/// Usage line shown when the CSV argument is missing.
pub fn usage() -> String {
    let mut cmd = Cli::command();
    format!("Pass csv file as argument\n{}", cmd.render_usage())
}

/// Exit status for a clap parse outcome: `0` for `--help`/`--version`,
/// [`EXIT_USAGE`] for every argument error.
pub fn exit_code_for(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_USAGE,
    }
}
