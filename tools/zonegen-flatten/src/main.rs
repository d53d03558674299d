//! Rewrites a dataset read on stdin in the flat text format.
//!
//! ```text
//! zonegen-flatten < validation_data.json > validation_data.txt
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::io::{self, BufWriter, Read};

use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use log::info;
use zonegen::Dataset;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {}

/// Program entry point.
fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let _ = Cli::parse();

    let mut json = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut json)
        .wrap_err("failed to read the dataset from stdin")?;
    let dataset = Dataset::from_json_str(&json)?;
    info!("Flattening {} zones", dataset.test_data.len());
    dataset.write_flat(BufWriter::new(io::stdout().lock()))?;
    Ok(())
}
