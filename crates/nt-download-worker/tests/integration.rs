//! End-to-end exercise of the download worker against real backing
//! services. Ignored by default since it needs a live Postgres, a live
//! ClickHouse, and a live AMQP broker; run explicitly once `DATABASE_URL`,
//! `CLICKHOUSE_URL`, and `AMQP_URL` are set.

use nt_availability_gate::AvailabilityGate;
use nt_download_worker::{DownloadWorker, PackageIndexClient, PackageIndexEntry, WorkerConfig};
use nt_errors::Error;
use nt_metadata_store::MetadataStore;
use nt_queue_bus::{BusConfig, QueueBus};
use nt_timeseries_store::TimeseriesStore;
use std::sync::Arc;
use std::time::Duration;

struct FakeIndexClient;

impl PackageIndexClient for FakeIndexClient {
    async fn lookup(&self, _package_id_lower: &str) -> Result<PackageIndexEntry, Error> {
        Ok(PackageIndexEntry {
            download_count: 42,
            icon_url: Some("https://example.test/icon.png".to_string()),
        })
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres, ClickHouse, and AMQP broker"]
async fn worker_drains_a_batch_and_acks_it() {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
    let clickhouse_url = std::env::var("CLICKHOUSE_URL").expect("CLICKHOUSE_URL");
    let amqp_url = std::env::var("AMQP_URL").expect("AMQP_URL");

    let metadata = MetadataStore::connect(&database_url, 4).await.unwrap();
    metadata.migrate().await.unwrap();

    let timeseries = TimeseriesStore::new(&clickhouse_url, "nuget_trends_test");
    timeseries.migrate().await.unwrap();

    let bus_config = BusConfig {
        url: amqp_url,
        queue_name: "download-worker-integration-test".to_string(),
        ..BusConfig::default()
    };
    let publisher_bus = QueueBus::connect(bus_config.clone()).await.unwrap();
    publisher_bus
        .publish_batch(&["Newtonsoft.Json".to_string()])
        .await
        .unwrap();

    let worker_bus = QueueBus::connect(bus_config).await.unwrap();
    let gate = Arc::new(AvailabilityGate::new(Duration::from_secs(300)));
    let (tx, _rx) = nt_events::channel();

    let worker = DownloadWorker::new(
        worker_bus,
        gate,
        FakeIndexClient,
        metadata.clone(),
        timeseries,
        WorkerConfig {
            lookup_concurrency: 4,
        },
        tx,
    );

    let run = tokio::time::timeout(Duration::from_secs(5), worker.run("test-consumer"));
    let _ = run.await;

    let recorded = metadata
        .downloads()
        .get("newtonsoft.json")
        .await
        .unwrap()
        .expect("row written by worker");
    assert_eq!(recorded.latest_download_count, Some(42));
}
