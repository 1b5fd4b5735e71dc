//! Metadata store (component D) and cursor store (component B) error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum MetadataStoreError {
    #[error("database error: {message}")]
    DatabaseError { message: String },

    #[error("duplicate key: {message}")]
    DuplicateKey { message: String },

    #[error("migration failed: {message}")]
    MigrationFailed { message: String },
}

impl UserFacingError for MetadataStoreError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateKey { .. } => {
                Some("Absorbed by the batch-apply contract; the offending row is detached.")
            }
            Self::DatabaseError { .. } => Some("Check the metadata store connection."),
            Self::MigrationFailed { .. } => Some("Review migration logs before restarting."),
        }
    }

    fn is_retryable(&self) -> bool {
        // Duplicate keys are handled in-batch, not retried as a failure.
        matches!(self, Self::DatabaseError { .. })
    }
}
