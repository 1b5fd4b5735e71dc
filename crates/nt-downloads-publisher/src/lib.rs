#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Downloads Publisher (component F).
//!
//! A daily job: stream today's pending candidate packages out of the
//! metadata store, buffer them into fixed-size batches, and publish each
//! full batch (or a non-empty tail) to the queue bus. Deliberately has no
//! in-process retry: per §4.F, publication failures fail the job outright
//! and are retried at the next scheduled tick.

use futures::StreamExt;
use nt_errors::Error;
use nt_events::{AppEvent, EventEmitter, EventSender, QueueEvent};
use nt_metadata_store::MetadataStore;
use nt_queue_bus::QueueBus;
use nt_types::DOWNLOAD_BATCH_SIZE;

pub struct DownloadsPublisher {
    store: MetadataStore,
    bus: QueueBus,
    /// §6 `downloads.batch_size`; defaults to [`DOWNLOAD_BATCH_SIZE`] but is
    /// configurable per deployment.
    batch_size: usize,
    tx: EventSender,
}

impl EventEmitter for DownloadsPublisher {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Result of one publish run, used for the §10.3 counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishRunSummary {
    pub packages_streamed: usize,
    pub batches_published: usize,
}

impl DownloadsPublisher {
    /// `batch_size` of `0` falls back to [`DOWNLOAD_BATCH_SIZE`]; `nt-config`
    /// already rejects a configured `0` at load time, this is just a safe
    /// floor for callers that bypass it.
    #[must_use]
    pub fn new(store: MetadataStore, bus: QueueBus, batch_size: usize, tx: EventSender) -> Self {
        Self {
            store,
            bus,
            batch_size: if batch_size == 0 { DOWNLOAD_BATCH_SIZE } else { batch_size },
            tx,
        }
    }

    /// Run one publish cycle.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered, whether from the streaming
    /// read or from publication; the caller is expected to retry the whole
    /// run at the next scheduled tick rather than resume mid-stream.
    pub async fn run(&self) -> Result<PublishRunSummary, Error> {
        self.emit(AppEvent::Queue(QueueEvent::PublishRunStarted));

        let today = nt_metadata_store::downloads::today_utc();
        let downloads = self.store.downloads();
        let mut stream = Box::pin(downloads.stream_pending_today(today));

        let mut summary = PublishRunSummary::default();
        let mut buffer = Vec::with_capacity(self.batch_size);

        while let Some(id) = stream.next().await {
            let id = match id {
                Ok(id) => id,
                Err(e) => {
                    self.emit(AppEvent::Queue(QueueEvent::PublishRunCompleted {
                        batches_published: summary.batches_published,
                    }));
                    return Err(e);
                }
            };

            summary.packages_streamed += 1;
            buffer.push(id);

            if buffer.len() >= self.batch_size {
                self.publish(&mut buffer).await?;
                summary.batches_published += 1;
            }
        }

        if !buffer.is_empty() {
            self.publish(&mut buffer).await?;
            summary.batches_published += 1;
        }

        self.emit(AppEvent::Queue(QueueEvent::PublishRunCompleted {
            batches_published: summary.batches_published,
        }));

        Ok(summary)
    }

    async fn publish(&self, buffer: &mut Vec<String>) -> Result<(), Error> {
        self.bus.publish_batch(buffer).await?;
        self.emit(AppEvent::Queue(QueueEvent::BatchPublished {
            batch_size: buffer.len(),
        }));
        buffer.clear();
        Ok(())
    }
}
