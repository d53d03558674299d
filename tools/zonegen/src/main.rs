//! Generates a validation dataset for the zones listed on stdin.
//!
//! ```text
//! zonegen [--start-year N] [--until-year N] [--epoch-year N] < zones.txt > validation_data.json
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::{
    eyre::{bail, WrapErr},
    Result,
};
use log::info;
use zonegen::{
    read_zones, DatasetAssembler, GeneratorOptions, DEFAULT_EPOCH_YEAR, DEFAULT_START_YEAR,
    DEFAULT_UNTIL_YEAR,
};
use zonegen_provider::{CompiledTzdbProvider, FsTzdbProvider, RulesProvider};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// First year to generate data for.
    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    start_year: i32,

    /// Year to stop at, exclusive.
    #[arg(long, default_value_t = DEFAULT_UNTIL_YEAR)]
    until_year: i32,

    /// Year whose January 1st, UTC, is epoch 0 in the output.
    #[arg(long, default_value_t = DEFAULT_EPOCH_YEAR)]
    epoch_year: i32,

    /// Read TZif files from this directory instead of the bundled database.
    #[arg(long, env = "ZONEGEN_ZONEINFO_DIR")]
    zoneinfo_dir: Option<PathBuf>,

    /// Write the dataset to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print the available zone identifiers and exit.
    #[arg(long)]
    print_zones: bool,
}

/// Program entry point.
fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.zoneinfo_dir.clone() {
        Some(dir) => {
            if !dir.is_dir() {
                bail!("zoneinfo directory {} does not exist", dir.display());
            }
            run(&cli, FsTzdbProvider::new(dir))
        }
        None => run(&cli, CompiledTzdbProvider::new()),
    }
}

fn run<P: RulesProvider>(cli: &Cli, provider: P) -> Result<()> {
    if cli.print_zones {
        return print_zones(&provider);
    }

    let options = GeneratorOptions::new(cli.start_year, cli.until_year, cli.epoch_year)?;
    let zones = read_zones(io::stdin().lock()).wrap_err("failed to read zones from stdin")?;
    info!(
        "Generating {} zones from {} (tzdb {})",
        zones.len(),
        provider.source(),
        provider.tz_version().unwrap_or("unknown")
    );

    let dataset = DatasetAssembler::new(provider, options).assemble(&zones);
    info!("Generated {} of {} zones", dataset.test_data.len(), zones.len());

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create {}", path.display()))?;
            dataset.write_json(BufWriter::new(file))?;
        }
        None => dataset.write_json(io::stdout().lock())?,
    }
    Ok(())
}

fn print_zones<P: RulesProvider>(provider: &P) -> Result<()> {
    let zones = provider.available_identifiers()?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Found {} ids total:", zones.len())?;
    for zone in zones {
        writeln!(stdout, "  {zone}")?;
    }
    Ok(())
}
