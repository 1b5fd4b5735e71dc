#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Download Worker (component G).
//!
//! Long-running consumer of the queue bus (E): for each batch, consults
//! the availability gate (J), fans out bounded-concurrency lookups to the
//! upstream package index, and dual-writes successes to the metadata
//! store (D) and the time-series store (H).

mod index_client;

pub use index_client::{HttpPackageIndexClient, PackageIndexClient, PackageIndexEntry};

use futures::stream::{self, StreamExt};
use nt_availability_gate::AvailabilityGate;
use nt_errors::{Error, NetworkError};
use nt_events::{AppEvent, AvailabilityEvent, DownloadEvent, EventEmitter, EventSender};
use nt_metadata_store::MetadataStore;
use nt_queue_bus::{Batch, QueueBus};
use nt_timeseries_store::{DailyDownloadInsert, TimeseriesStore};
use nt_types::PackageDownload;
use std::sync::Arc;

pub struct WorkerConfig {
    pub lookup_concurrency: usize,
}

pub struct DownloadWorker<C: PackageIndexClient> {
    bus: QueueBus,
    gate: Arc<AvailabilityGate>,
    index_client: C,
    metadata: MetadataStore,
    timeseries: TimeseriesStore,
    config: WorkerConfig,
    tx: EventSender,
}

impl<C: PackageIndexClient> EventEmitter for DownloadWorker<C> {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Outcome of one lookup, kept internal to drive the batch-level decision.
enum LookupOutcome {
    Success {
        package_id_lower: String,
        entry: PackageIndexEntry,
    },
    Failed {
        package_id_lower: String,
        error: Error,
    },
}

impl<C: PackageIndexClient> DownloadWorker<C> {
    #[must_use]
    pub fn new(
        bus: QueueBus,
        gate: Arc<AvailabilityGate>,
        index_client: C,
        metadata: MetadataStore,
        timeseries: TimeseriesStore,
        config: WorkerConfig,
        tx: EventSender,
    ) -> Self {
        Self {
            bus,
            gate,
            index_client,
            metadata,
            timeseries,
            config,
            tx,
        }
    }

    /// Consume forever from `consumer_tag`, processing each delivery in
    /// turn. Runs until the connection is dropped or an unrecoverable
    /// error occurs.
    ///
    /// # Errors
    ///
    /// Returns an error if the consumer cannot be established, or if a
    /// delivery fails to be read from the underlying stream.
    pub async fn run(&self, consumer_tag: &str) -> Result<(), Error> {
        let mut consumer = self.bus.consume(consumer_tag).await?;

        while let Some(delivery) = consumer.next().await {
            let delivery = delivery.map_err(|e| nt_errors::QueueError::Disconnected {
                message: e.to_string(),
            })?;

            let batch = Batch::decode(&delivery.data)?;
            self.emit(AppEvent::Download(DownloadEvent::BatchLookupStarted {
                count: batch.len(),
            }));

            if !self.gate.is_available() {
                self.emit(AppEvent::Download(DownloadEvent::BatchSkippedUnavailable {
                    count: batch.len(),
                }));
                self.bus.nack(&delivery, true).await?;
                continue;
            }

            let outcomes = self.lookup_batch(&batch).await;

            if is_general_outage(&outcomes) {
                self.gate.mark_unavailable();
                self.emit(AppEvent::Availability(AvailabilityEvent::MarkedUnavailable {
                    reason: "all lookups in batch failed with outage-indicating errors".to_string(),
                }));
                self.bus.nack(&delivery, true).await?;
                continue;
            }

            let (succeeded, failed) = self.apply_outcomes(outcomes).await?;
            self.emit(AppEvent::Download(DownloadEvent::BatchLookupCompleted {
                succeeded,
                failed,
            }));

            self.bus.ack(&delivery).await?;
        }

        Ok(())
    }

    async fn lookup_batch(&self, batch: &Batch) -> Vec<LookupOutcome> {
        let concurrency = self.config.lookup_concurrency.max(1);
        stream::iter(batch.package_ids_lower.iter().cloned().map(|id| async move {
            match self.index_client.lookup(&id).await {
                Ok(entry) => LookupOutcome::Success {
                    package_id_lower: id,
                    entry,
                },
                Err(error) => LookupOutcome::Failed {
                    package_id_lower: id,
                    error,
                },
            }
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await
    }

    async fn apply_outcomes(&self, outcomes: Vec<LookupOutcome>) -> Result<(usize, usize), Error> {
        let today = nt_metadata_store::downloads::today_utc();
        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut daily_rows = Vec::new();

        for outcome in outcomes {
            match outcome {
                LookupOutcome::Success {
                    package_id_lower,
                    entry,
                } => {
                    daily_rows.push(DailyDownloadInsert {
                        package_id_lower: package_id_lower.clone(),
                        date: today,
                        download_count: u64::try_from(entry.download_count.max(0)).unwrap_or(0),
                    });

                    self.metadata
                        .downloads()
                        .upsert(&PackageDownload {
                            package_id: package_id_lower.clone(),
                            package_id_lower: package_id_lower.clone(),
                            latest_download_count: Some(entry.download_count),
                            latest_download_checked_utc: chrono::Utc::now(),
                            icon_url: entry.icon_url.clone(),
                        })
                        .await?;

                    self.emit(AppEvent::Download(DownloadEvent::CountRecorded {
                        package_id: package_id_lower,
                        download_count: entry.download_count,
                    }));
                    succeeded += 1;
                }
                LookupOutcome::Failed {
                    package_id_lower,
                    error,
                } => {
                    self.emit(AppEvent::Download(DownloadEvent::LookupFailed {
                        package_id: package_id_lower,
                        error: error.to_string(),
                    }));
                    failed += 1;
                }
            }
        }

        self.timeseries.insert_daily(&daily_rows).await?;

        Ok((succeeded, failed))
    }
}

/// A batch is treated as a general outage when every lookup failed and at
/// least one failure is the kind of error that indicates the upstream
/// itself is down, rather than a per-package issue (§4.G step 3).
fn is_general_outage(outcomes: &[LookupOutcome]) -> bool {
    if outcomes.is_empty() {
        return false;
    }
    outcomes.iter().all(|o| match o {
        LookupOutcome::Failed { error, .. } => matches!(
            error,
            Error::Network(e) if e.indicates_outage()
        ),
        LookupOutcome::Success { .. } => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(id: &str, err: NetworkError) -> LookupOutcome {
        LookupOutcome::Failed {
            package_id_lower: id.to_string(),
            error: err.into(),
        }
    }

    fn success(id: &str) -> LookupOutcome {
        LookupOutcome::Success {
            package_id_lower: id.to_string(),
            entry: PackageIndexEntry {
                download_count: 1,
                icon_url: None,
            },
        }
    }

    #[test]
    fn all_outage_failures_trip_the_gate() {
        let outcomes = vec![
            failed("a", NetworkError::UpstreamUnavailable),
            failed("b", NetworkError::Timeout { url: "x".into() }),
        ];
        assert!(is_general_outage(&outcomes));
    }

    #[test]
    fn mixed_results_do_not_trip_the_gate() {
        let outcomes = vec![success("a"), failed("b", NetworkError::UpstreamUnavailable)];
        assert!(!is_general_outage(&outcomes));
    }

    #[test]
    fn non_outage_failures_do_not_trip_the_gate() {
        let outcomes = vec![failed("a", NetworkError::NotFound { url: "x".into() })];
        assert!(!is_general_outage(&outcomes));
    }
}
