use serde::{Deserialize, Serialize};

/// Events emitted by the download worker (component G) while resolving
/// per-package download counts from upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// A lookup batch started resolving `count` package ids concurrently.
    BatchLookupStarted { count: usize },

    /// A single package's download count was fetched and recorded.
    CountRecorded {
        package_id: String,
        download_count: i64,
    },

    /// A single package lookup failed (network error, malformed response, etc).
    LookupFailed { package_id: String, error: String },

    /// A lookup batch finished; includes how many succeeded and failed.
    BatchLookupCompleted { succeeded: usize, failed: usize },

    /// The worker skipped a batch entirely because upstream was marked unavailable.
    BatchSkippedUnavailable { count: usize },
}
