use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cauce climate anomaly and runoff statistics.
#[derive(Parser)]
#[command(
    name = "cauce",
    version,
    about = "Climate anomaly and runoff statistics for basin-scale projection studies"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors; skipped units are not logged.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Baseline-versus-projection anomalies of a gridded variable.
    Anomaly(RunArgs),
    /// Annual runoff summaries, Mann-Kendall trends and model comparison.
    Trend(RunArgs),
    /// Initial-versus-final window comparison per basin and model.
    Compare(RunArgs),
    /// Seasonal decomposition and seasonal change tables.
    Seasonal(RunArgs),
    /// ENSO, megadrought or custom stratified group tests.
    Regime(RunArgs),
    /// Glacier area and volume loss totals.
    Losses(RunArgs),
}

/// Arguments shared by every subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "cauce.toml")]
    pub config: PathBuf,

    /// Override the output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cauce", "trend", "-c", "run.toml", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        let Command::Trend(args) = cli.command else {
            panic!("expected trend");
        };
        assert_eq!(args.config, PathBuf::from("run.toml"));
        assert!(args.output.is_none());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["cauce", "-q", "regime"]).unwrap().quiet);
        assert!(Cli::try_parse_from(["cauce", "-q", "-v", "regime"]).is_err());
    }
}
