use serde::{Deserialize, Serialize};

/// Events emitted by the weekly snapshot refreshers (component I).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SnapshotEvent {
    /// A refresher job acquired its advisory lock and started running.
    JobStarted { job_name: String },

    /// A refresher job could not acquire its advisory lock; another instance
    /// already holds it, so this run is skipped.
    JobSkippedLocked { job_name: String },

    /// A refresher job finished computing and writing its snapshot rows.
    JobCompleted { job_name: String, rows_written: usize },

    /// A refresher job failed.
    JobFailed { job_name: String, error: String },
}
