//! nugettrends-scheduler
//!
//! Hosts the catalog walk (C), the downloads publisher (F), and the two
//! weekly snapshot refreshers (I), each driven by its own cron schedule
//! (§5, §6). A single `SIGINT`/`SIGTERM` handler cancels every in-flight
//! tick and the process exits once it finishes.

mod cli;
mod error;
mod logging;
mod setup;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::setup::SystemSetup;
use chrono::Utc;
use clap::Parser;
use cron::Schedule;
use nt_config::Config;
use std::process;
use std::str::FromStr;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load_or_default(cli.config.as_deref()).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            process::exit(1);
        }
    };

    logging::init(&config.logging, cli.json);

    if let Err(e) = run(cli, config).await {
        error!("scheduler error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    info!("starting nugettrends-scheduler v{}", env!("CARGO_PKG_VERSION"));

    let (tx, rx) = nt_events::channel();
    let mut counters = nt_events::EventCounters::default();
    let subscriber = tokio::spawn(async move {
        nt_events::run_subscriber(rx, &mut counters).await;
        counters
    });

    let setup = SystemSetup::initialize(&config, tx).await?;

    if let Some(command) = cli.command {
        run_once(&setup, &command).await?;
        drop(setup);
        let _ = subscriber.await;
        return Ok(());
    }

    let cancel = CancellationToken::new();
    spawn_signal_watcher(cancel.clone());

    let result = run_loop(&setup, &config, cancel).await;
    drop(setup);
    let _ = subscriber.await;
    result
}

async fn run_once(setup: &SystemSetup, command: &Commands) -> Result<(), CliError> {
    match command {
        Commands::RunCatalog => {
            setup.catalog_processor().process().await?;
        }
        Commands::RunPublisher => {
            setup.downloads_publisher().run().await?;
        }
        Commands::RunTrending => {
            setup.trending_refresher().run().await?;
        }
        Commands::RunTfm => {
            setup.tfm_refresher().run().await?;
        }
    }
    Ok(())
}

/// Drive three independent cron loops concurrently: the catalog walk runs
/// on a short interval (its own internal cursor makes each tick
/// incremental); the publisher and the two refreshers run on the cron
/// expressions from `§6`.
async fn run_loop(setup: &SystemSetup, config: &Config, cancel: CancellationToken) -> Result<(), CliError> {
    let catalog_interval = tokio::time::Duration::from_secs(60);
    let publisher_schedule = parse_schedule(&config.schedule.publisher_cron, "schedule.publisher_cron")?;
    let trending_schedule = parse_schedule(&config.schedule.trending_cron, "schedule.trending_cron")?;
    let tfm_schedule = parse_schedule(&config.schedule.tfm_cron, "schedule.tfm_cron")?;

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!("shutdown signal received, exiting scheduler loop");
                return Ok(());
            }
            () = tokio::time::sleep(catalog_interval) => {
                if let Err(e) = setup.catalog_processor().process().await {
                    warn!("catalog walk failed, will retry next tick: {e}");
                }
            }
            () = sleep_until_next(&publisher_schedule) => {
                if let Err(e) = setup.downloads_publisher().run().await {
                    warn!("downloads publish failed, will retry next tick: {e}");
                }
            }
            () = sleep_until_next(&trending_schedule) => {
                if let Err(e) = setup.trending_refresher().run().await {
                    warn!("trending refresh failed, will retry next tick: {e}");
                }
            }
            () = sleep_until_next(&tfm_schedule) => {
                if let Err(e) = setup.tfm_refresher().run().await {
                    warn!("tfm refresh failed, will retry next tick: {e}");
                }
            }
        }
    }
}

fn parse_schedule(expr: &str, field: &str) -> Result<Schedule, CliError> {
    Schedule::from_str(expr).map_err(|_| CliError::Setup(format!("invalid cron expression for {field}: {expr}")))
}

async fn sleep_until_next(schedule: &Schedule) {
    let Some(next) = schedule.upcoming(Utc).next() else {
        std::future::pending::<()>().await;
        return;
    };
    let delay = (next - Utc::now()).to_std().unwrap_or(tokio::time::Duration::ZERO);
    tokio::time::sleep(delay).await;
}

fn spawn_signal_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
        cancel.cancel();
    });
}
