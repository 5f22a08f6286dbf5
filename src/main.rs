mod anomaly_cmd;
mod cli;
mod compare_cmd;
mod config;
mod convert;
mod logging;
mod losses_cmd;
mod regime_cmd;
mod seasonal_cmd;
mod trend_cmd;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::{Cli, Command, RunArgs};
use crate::config::CauceConfig;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Anomaly(args) => with_config(&args, anomaly_cmd::run),
        Command::Trend(args) => with_config(&args, trend_cmd::run),
        Command::Compare(args) => with_config(&args, compare_cmd::run),
        Command::Seasonal(args) => with_config(&args, seasonal_cmd::run),
        Command::Regime(args) => with_config(&args, regime_cmd::run),
        Command::Losses(args) => with_config(&args, losses_cmd::run),
    }
}

/// Load the config, apply the `--output` override and hand both to `cmd`.
fn with_config(
    args: &RunArgs,
    cmd: fn(&CauceConfig, &std::path::Path) -> Result<()>,
) -> Result<()> {
    let config = CauceConfig::load(&args.config)
        .with_context(|| format!("failed to load config: {}", args.config.display()))?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    cmd(&config, &output)
}
