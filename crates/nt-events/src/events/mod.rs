use serde::{Deserialize, Serialize};

pub mod availability;
pub mod catalog;
pub mod download;
pub mod general;
pub mod queue;
pub mod snapshot;

pub use availability::AvailabilityEvent;
pub use catalog::CatalogEvent;
pub use download::DownloadEvent;
pub use general::GeneralEvent;
pub use queue::QueueEvent;
pub use snapshot::SnapshotEvent;

/// Top-level event enum aggregating every domain's events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    General(GeneralEvent),
    Catalog(CatalogEvent),
    Queue(QueueEvent),
    Download(DownloadEvent),
    Availability(AvailabilityEvent),
    Snapshot(SnapshotEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event.
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            AppEvent::General(GeneralEvent::Error { .. }) => Level::ERROR,
            AppEvent::General(GeneralEvent::OperationFailed { .. }) => Level::ERROR,
            AppEvent::Catalog(CatalogEvent::WalkFailed { .. }) => Level::ERROR,
            AppEvent::Catalog(CatalogEvent::LeafFetchFailed { .. }) => Level::WARN,
            AppEvent::Queue(QueueEvent::ConnectionLost { .. }) => Level::ERROR,
            AppEvent::Queue(QueueEvent::BatchNacked { .. }) => Level::WARN,
            AppEvent::Download(DownloadEvent::LookupFailed { .. }) => Level::WARN,
            AppEvent::Availability(AvailabilityEvent::MarkedUnavailable { .. }) => Level::WARN,
            AppEvent::Availability(AvailabilityEvent::ProbeFailed { .. }) => Level::DEBUG,
            AppEvent::Snapshot(SnapshotEvent::JobFailed { .. }) => Level::ERROR,
            AppEvent::General(GeneralEvent::Warning { .. }) => Level::WARN,
            AppEvent::General(GeneralEvent::DebugLog { .. }) => Level::DEBUG,
            _ => Level::INFO,
        }
    }

    /// Tracing target string used when emitting this event as a log record.
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            AppEvent::General(_) => "nugettrends::general",
            AppEvent::Catalog(_) => "nugettrends::catalog",
            AppEvent::Queue(_) => "nugettrends::queue",
            AppEvent::Download(_) => "nugettrends::download",
            AppEvent::Availability(_) => "nugettrends::availability",
            AppEvent::Snapshot(_) => "nugettrends::snapshot",
        }
    }
}
