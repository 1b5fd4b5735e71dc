//! Component wiring for the worker process.

use crate::error::CliError;
use nt_availability_gate::AvailabilityGate;
use nt_catalog_client::{NetClient, NetConfig};
use nt_config::Config;
use nt_download_worker::{DownloadWorker, HttpPackageIndexClient, WorkerConfig};
use nt_events::EventSender;
use nt_metadata_store::MetadataStore;
use nt_queue_bus::QueueBus;
use nt_timeseries_store::TimeseriesStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Holds every component the worker process needs to run its consumer
/// pool (G) against the shared availability gate (J).
pub struct SystemSetup {
    bus: QueueBus,
    gate: Arc<AvailabilityGate>,
    index_client: HttpPackageIndexClient,
    metadata: MetadataStore,
    timeseries: TimeseriesStore,
    lookup_concurrency: usize,
    tx: EventSender,
}

impl SystemSetup {
    /// Connect to every backing store and the queue bus, and build the
    /// shared gate (J) that every spawned worker task will consult.
    ///
    /// # Errors
    ///
    /// Returns an error if any backing store or the queue broker cannot
    /// be reached, or if its migrations fail to apply.
    pub async fn initialize(
        config: &Config,
        package_index_url_template: String,
        tx: EventSender,
    ) -> Result<Self, CliError> {
        info!("connecting to metadata store");
        let metadata = MetadataStore::connect(&config.metadata.connection, config.metadata.max_connections)
            .await?;
        metadata.migrate().await?;

        info!("connecting to time-series store");
        let timeseries = TimeseriesStore::new(&config.timeseries.connection, &config.timeseries.database);
        timeseries.migrate().await?;

        let net_client = NetClient::new(NetConfig {
            timeout: config.downloads.per_request_timeout,
            ..NetConfig::default()
        })
        .map_err(|e| CliError::Setup(format!("failed to build HTTP client: {e}")))?;
        let index_client = HttpPackageIndexClient::new(net_client, package_index_url_template);

        info!("connecting to queue bus");
        let bus = QueueBus::connect(nt_queue_bus::BusConfig {
            url: config.bus.url.clone(),
            queue_name: config.bus.queue_name.clone(),
            message_ttl: Duration::from_secs(config.bus.message_ttl_secs),
            prefetch_count: u16::try_from(config.downloads.worker_count).unwrap_or(u16::MAX),
        })
        .await?;

        let gate = Arc::new(AvailabilityGate::new(Duration::from_secs(config.availability.cooldown_secs)));

        Ok(Self {
            bus,
            gate,
            index_client,
            metadata,
            timeseries,
            lookup_concurrency: config.downloads.lookup_concurrency,
            tx,
        })
    }

    /// Build one independent `DownloadWorker`, cloning the shared bus
    /// connection, gate, index client, and store handles. Each clone of
    /// `QueueBus` rides the same underlying channel, so every spawned
    /// worker is an independent in-process consumer against the same
    /// prefetch-bounded queue (§5).
    #[must_use]
    pub fn build_worker(&self) -> DownloadWorker<HttpPackageIndexClient> {
        DownloadWorker::new(
            self.bus.clone(),
            Arc::clone(&self.gate),
            self.index_client.clone(),
            self.metadata.clone(),
            self.timeseries.clone(),
            WorkerConfig {
                lookup_concurrency: self.lookup_concurrency,
            },
            self.tx.clone(),
        )
    }
}
