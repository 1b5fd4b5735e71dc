//! Snapshot refresher (component I) error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("compute failed: {message}")]
    ComputeFailed { message: String },

    #[error("write failed: {message}")]
    WriteFailed { message: String },

    #[error("job lock not acquired: {job_name}")]
    LockNotAcquired { job_name: String },
}

impl UserFacingError for SnapshotError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::LockNotAcquired { .. } => {
                Some("Another instance of this job is already running; the tick is skipped.")
            }
            _ => Some("On failure the next scheduled tick restarts the refresh from scratch."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::ComputeFailed { .. } | Self::WriteFailed { .. })
    }
}
