//! Time-series store (component H) error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum TimeseriesStoreError {
    #[error("database error: {message}")]
    DatabaseError { message: String },

    #[error("insert failed: {message}")]
    InsertFailed { message: String },

    #[error("query failed: {message}")]
    QueryFailed { message: String },
}

impl UserFacingError for TimeseriesStoreError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::DatabaseError { .. } | Self::InsertFailed { .. })
    }
}
