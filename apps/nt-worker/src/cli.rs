//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;

/// nugettrends-worker - consumes daily-download batches from the queue
/// bus and writes per-package counts to the metadata and time-series
/// stores.
#[derive(Parser)]
#[command(name = "nugettrends-worker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Download worker process for the NuGet Trends ingestion pipeline")]
pub struct Cli {
    /// Path to a TOML config file; falls back to compiled defaults and
    /// environment overrides when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit structured JSON logs instead of the pretty format.
    #[arg(long)]
    pub json: bool,

    /// URL template for the upstream package index lookup; `{id}` is
    /// replaced with the lowercased package id.
    #[arg(
        long,
        env = "NUGETTRENDS_PACKAGE_INDEX_URL_TEMPLATE",
        default_value = "https://azuresearch-usnc.nuget.org/query?q=packageid:{id}&prerelease=true"
    )]
    pub package_index_url_template: String,
}
