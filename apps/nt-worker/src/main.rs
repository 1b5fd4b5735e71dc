//! nugettrends-worker
//!
//! Hosts a pool of `M` in-process consumers (G) that drain the queue bus
//! (E), each guarded by the shared availability gate (J). Unacked
//! deliveries are redelivered by the broker, so shutdown does not wait
//! for an in-flight batch to finish: the first consumer task to observe
//! the cancellation signal exits, and the process follows once every
//! task has stopped.

mod cli;
mod error;
mod logging;
mod setup;

use crate::cli::Cli;
use crate::error::CliError;
use crate::setup::SystemSetup;
use clap::Parser;
use nt_config::Config;
use std::process;
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
        error!("worker error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    info!("starting nugettrends-worker v{}", env!("CARGO_PKG_VERSION"));

    let (tx, rx) = nt_events::channel();
    let mut counters = nt_events::EventCounters::default();
    let subscriber = tokio::spawn(async move {
        nt_events::run_subscriber(rx, &mut counters).await;
        counters
    });

    let setup = SystemSetup::initialize(&config, cli.package_index_url_template, tx).await?;

    let cancel = CancellationToken::new();
    spawn_signal_watcher(cancel.clone());

    let worker_count = config.downloads.worker_count.max(1);
    info!(worker_count, "spawning download worker pool");

    let mut tasks = Vec::with_capacity(worker_count);
    for i in 0..worker_count {
        let worker = setup.build_worker();
        let cancel = cancel.clone();
        let consumer_tag = format!("worker-{i}");
        tasks.push(tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!(consumer_tag, "shutdown signal received, stopping consumer");
                }
                result = worker.run(&consumer_tag) => {
                    if let Err(e) = result {
                        warn!(consumer_tag, "consumer exited with an error: {e}");
                    }
                }
            }
        }));
    }

    for task in tasks {
        let _ = task.await;
    }

    drop(setup);
    let _ = subscriber.await;
    Ok(())
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
