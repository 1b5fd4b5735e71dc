#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Structured event system used across the nugettrends binaries.
//!
//! Every component reports what it does through a small `AppEvent` enum
//! instead of logging or printing directly. A subscriber task owns the
//! receiving end of the channel and converts events into `tracing` records
//! plus a handful of in-process counters.

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{
    AppEvent, AvailabilityEvent, CatalogEvent, DownloadEvent, GeneralEvent, QueueEvent,
    SnapshotEvent,
};

use tokio::sync::mpsc::UnboundedSender;

pub type EventSender = UnboundedSender<AppEvent>;
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Unified trait for emitting events from any component that holds a sender.
pub trait EventEmitter {
    fn event_sender(&self) -> Option<&EventSender>;

    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            let _ = sender.send(event);
        }
    }

    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }

    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    fn emit_operation_failed(&self, operation: impl Into<String>, error: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            error: error.into(),
        }));
    }
}

/// Lets a raw `EventSender` be used directly wherever `EventEmitter` is expected.
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// Lightweight in-process counters maintained by the subscriber task, per
/// §10.3: packages streamed, batches published/consumed, leaves applied,
/// duplicate keys detached, availability transitions.
#[derive(Debug, Default)]
pub struct EventCounters {
    pub leaves_applied: u64,
    pub duplicates_detached: u64,
    pub batches_published: u64,
    pub batches_consumed: u64,
    pub download_counts_recorded: u64,
    pub download_lookups_failed: u64,
    pub availability_transitions: u64,
    pub snapshot_jobs_completed: u64,
    pub snapshot_jobs_failed: u64,
}

impl EventCounters {
    /// Fold a single event into the running counters.
    pub fn record(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Catalog(CatalogEvent::LeavesApplied {
                applied,
                duplicates_detached,
            }) => {
                self.leaves_applied += *applied as u64;
                self.duplicates_detached += *duplicates_detached as u64;
            }
            AppEvent::Queue(QueueEvent::BatchPublished { .. }) => {
                self.batches_published += 1;
            }
            AppEvent::Queue(QueueEvent::BatchConsumed { .. }) => {
                self.batches_consumed += 1;
            }
            AppEvent::Download(DownloadEvent::CountRecorded { .. }) => {
                self.download_counts_recorded += 1;
            }
            AppEvent::Download(DownloadEvent::LookupFailed { .. }) => {
                self.download_lookups_failed += 1;
            }
            AppEvent::Availability(AvailabilityEvent::MarkedAvailable)
            | AppEvent::Availability(AvailabilityEvent::MarkedUnavailable { .. }) => {
                self.availability_transitions += 1;
            }
            AppEvent::Snapshot(SnapshotEvent::JobCompleted { .. }) => {
                self.snapshot_jobs_completed += 1;
            }
            AppEvent::Snapshot(SnapshotEvent::JobFailed { .. }) => {
                self.snapshot_jobs_failed += 1;
            }
            _ => {}
        }
    }
}

/// Drains events from `rx`, converting each into a `tracing` record and
/// folding it into `counters`. Intended to run as a dedicated subscriber
/// task for the lifetime of a binary.
pub async fn run_subscriber(mut rx: EventReceiver, counters: &mut EventCounters) {
    while let Some(event) = rx.recv().await {
        counters.record(&event);
        log_event(&event);
    }
}

fn log_event(event: &AppEvent) {
    let level = event.log_level();
    match event {
        AppEvent::General(_) => log_at_general(level, event),
        AppEvent::Catalog(_) => log_at_catalog(level, event),
        AppEvent::Queue(_) => log_at_queue(level, event),
        AppEvent::Download(_) => log_at_download(level, event),
        AppEvent::Availability(_) => log_at_availability(level, event),
        AppEvent::Snapshot(_) => log_at_snapshot(level, event),
    }
}

// `tracing`'s `target:` argument must be a string literal at the macro
// callsite (it feeds a `static` callsite record), so the target can't be
// passed in as a plain variable. One small function per domain keeps the
// literal inline while still dispatching on the runtime `level`.
macro_rules! log_fn_for_target {
    ($name:ident, $target:literal) => {
        fn $name(level: tracing::Level, event: &AppEvent) {
            match level {
                tracing::Level::ERROR => tracing::error!(target: $target, ?event),
                tracing::Level::WARN => tracing::warn!(target: $target, ?event),
                tracing::Level::DEBUG => tracing::debug!(target: $target, ?event),
                tracing::Level::TRACE => tracing::trace!(target: $target, ?event),
                tracing::Level::INFO => tracing::info!(target: $target, ?event),
            }
        }
    };
}

log_fn_for_target!(log_at_general, "nugettrends::general");
log_fn_for_target!(log_at_catalog, "nugettrends::catalog");
log_fn_for_target!(log_at_queue, "nugettrends::queue");
log_fn_for_target!(log_at_download, "nugettrends::download");
log_fn_for_target!(log_at_availability, "nugettrends::availability");
log_fn_for_target!(log_at_snapshot, "nugettrends::snapshot");

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counters_fold_events() {
        let (tx, rx) = channel();
        tx.emit(AppEvent::Catalog(CatalogEvent::LeavesApplied {
            applied: 3,
            duplicates_detached: 1,
        }));
        tx.emit(AppEvent::Queue(QueueEvent::BatchPublished { batch_size: 25 }));
        drop(tx);

        let mut counters = EventCounters::default();
        run_subscriber(rx, &mut counters).await;

        assert_eq!(counters.leaves_applied, 3);
        assert_eq!(counters.duplicates_detached, 1);
        assert_eq!(counters.batches_published, 1);
    }
}
