//! Compares an observed dataset with an expected one.
//!
//! ```text
//! zonegen-diff --observed observed.json --expected expected.json
//! ```
//!
//! Every difference is logged, and the exit status is non-zero if there
//! were any.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use log::{error, info};
use zonegen::Dataset;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// The dataset under test.
    #[arg(long)]
    observed: PathBuf,

    /// The baseline dataset.
    #[arg(long)]
    expected: PathBuf,
}

/// Program entry point.
fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let observed = read_dataset(&cli.observed)?;
    let expected = read_dataset(&cli.expected)?;

    let report = observed.diff(&expected);
    for difference in &report.differences {
        error!("{difference}");
    }
    if !report.is_match() {
        error!("Found {} differences", report.differences.len());
        return Ok(ExitCode::FAILURE);
    }
    info!("Done");
    Ok(ExitCode::SUCCESS)
}

fn read_dataset(path: &Path) -> Result<Dataset> {
    info!("Reading {}", path.display());
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    Dataset::from_json_str(&json).wrap_err_with(|| format!("failed to parse {}", path.display()))
}
