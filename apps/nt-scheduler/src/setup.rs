//! Component wiring for the scheduler process.

use crate::error::CliError;
use nt_catalog_client::{fetch_service_index, NetClient, NetConfig};
use nt_catalog_processor::{CatalogProcessor, ProcessorConfig};
use nt_config::Config;
use nt_downloads_publisher::DownloadsPublisher;
use nt_events::EventSender;
use nt_metadata_store::MetadataStore;
use nt_queue_bus::QueueBus;
use nt_snapshots::{TfmRefresher, TrendingRefresher};
use nt_timeseries_store::TimeseriesStore;
use std::time::Duration;
use tracing::info;

/// Holds every component the scheduler loop dispatches ticks to.
pub struct SystemSetup {
    metadata: MetadataStore,
    catalog_processor: CatalogProcessor,
    downloads_publisher: DownloadsPublisher,
    trending_refresher: TrendingRefresher,
    tfm_refresher: TfmRefresher,
}

impl SystemSetup {
    /// Connect to every backing store and build the scheduler-hosted
    /// components (C, F, I).
    ///
    /// # Errors
    ///
    /// Returns an error if any backing store cannot be reached or its
    /// migrations fail to apply, or if the catalog service index cannot
    /// be resolved.
    pub async fn initialize(config: &Config, tx: EventSender) -> Result<Self, CliError> {
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

        info!(url = %config.catalog.service_index_url, "resolving catalog service index");
        let service_index = fetch_service_index(&net_client, &config.catalog.service_index_url).await?;
        let catalog_index_url = service_index
            .resource_url("Catalog/3.0.0")
            .ok_or_else(|| CliError::Setup("service index has no Catalog/3.0.0 resource".to_string()))?
            .to_string();

        let catalog_processor = CatalogProcessor::new(
            net_client,
            metadata.clone(),
            ProcessorConfig {
                catalog_index_url,
                min_commit_timestamp: config.catalog.min_commit_timestamp,
                max_commit_timestamp: config.catalog.max_commit_timestamp,
                exclude_redundant_leaves: config.catalog.exclude_redundant_leaves,
                leaf_fetch_concurrency: config.catalog.leaf_fetch_concurrency,
            },
            tx.clone(),
        );

        info!("connecting to queue bus");
        let bus = QueueBus::connect(nt_queue_bus::BusConfig {
            url: config.bus.url.clone(),
            queue_name: config.bus.queue_name.clone(),
            message_ttl: Duration::from_secs(config.bus.message_ttl_secs),
            prefetch_count: u16::try_from(config.downloads.worker_count).unwrap_or(u16::MAX),
        })
        .await?;

        let downloads_publisher =
            DownloadsPublisher::new(metadata.clone(), bus, config.downloads.batch_size, tx.clone());
        let trending_refresher = TrendingRefresher::new(metadata.clone(), timeseries.clone(), tx.clone());
        let tfm_refresher = TfmRefresher::new(metadata.clone(), timeseries, tx);

        Ok(Self {
            metadata,
            catalog_processor,
            downloads_publisher,
            trending_refresher,
            tfm_refresher,
        })
    }

    #[must_use]
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    #[must_use]
    pub fn catalog_processor(&self) -> &CatalogProcessor {
        &self.catalog_processor
    }

    #[must_use]
    pub fn downloads_publisher(&self) -> &DownloadsPublisher {
        &self.downloads_publisher
    }

    #[must_use]
    pub fn trending_refresher(&self) -> &TrendingRefresher {
        &self.trending_refresher
    }

    #[must_use]
    pub fn tfm_refresher(&self) -> &TfmRefresher {
        &self.tfm_refresher
    }
}
