//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// nugettrends-scheduler - hosts the catalog walk, downloads publisher,
/// and weekly snapshot refreshers.
#[derive(Parser)]
#[command(name = "nugettrends-scheduler")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scheduler process for the NuGet Trends ingestion pipeline")]
pub struct Cli {
    /// Path to a TOML config file; falls back to compiled defaults and
    /// environment overrides when omitted.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit structured JSON logs instead of the pretty format.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for running a single job once, outside the cron loop.
/// With no subcommand, the scheduler runs its normal cron-driven loop.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one catalog walk and exit.
    RunCatalog,
    /// Run one downloads-publish cycle and exit.
    RunPublisher,
    /// Run one trending-snapshot refresh and exit.
    RunTrending,
    /// Run one TFM-adoption-snapshot refresh and exit.
    RunTfm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_no_subcommand() {
        let cli = Cli::parse_from(["nugettrends-scheduler"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_run_catalog_subcommand() {
        let cli = Cli::parse_from(["nugettrends-scheduler", "run-catalog"]);
        assert!(matches!(cli.command, Some(Commands::RunCatalog)));
    }

    #[test]
    fn parses_config_and_json_flags() {
        let cli = Cli::parse_from(["nugettrends-scheduler", "--json", "--config", "nt.toml"]);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("nt.toml")));
    }
}
