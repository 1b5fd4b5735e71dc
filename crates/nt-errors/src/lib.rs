#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the `NuGet Trends` ingestion core
//!
//! Fine-grained error enums organized by domain, mirroring the component
//! boundaries of the ingestion pipeline (catalog mirror, download pipeline,
//! snapshot refreshers). Each domain error implements [`UserFacingError`],
//! which the retry/backoff decisions in the processor and worker crates
//! read to decide whether to nack-and-requeue or drop.

pub mod availability;
pub mod catalog;
pub mod config;
pub mod metadata_store;
pub mod network;
pub mod queue;
pub mod snapshot;
pub mod timeseries_store;

pub use availability::AvailabilityError;
pub use catalog::CatalogError;
pub use config::ConfigError;
pub use metadata_store::MetadataStoreError;
pub use network::NetworkError;
pub use queue::QueueError;
pub use snapshot::SnapshotError;
pub use timeseries_store::TimeseriesStoreError;

use std::borrow::Cow;
use thiserror::Error;

/// A uniform way for domain errors to describe themselves to operators and
/// to the components that decide whether a failure is worth retrying.
pub trait UserFacingError: std::error::Error {
    /// A message suitable for logs or an operator-facing summary.
    fn user_message(&self) -> Cow<'_, str>;

    /// An optional actionable hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether the caller should retry (nack + requeue, reschedule the
    /// next tick, reconnect with backoff, …) rather than give up.
    fn is_retryable(&self) -> bool;
}

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("metadata store error: {0}")]
    MetadataStore(#[from] MetadataStoreError),

    #[error("time-series store error: {0}")]
    TimeseriesStore(#[from] TimeseriesStoreError),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("availability error: {0}")]
    Availability(#[from] AvailabilityError),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the underlying failure is worth retrying, per §7's error
    /// kinds. Cancellation and internal logic errors are never retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            Self::Catalog(e) => e.is_retryable(),
            Self::MetadataStore(e) => e.is_retryable(),
            Self::TimeseriesStore(e) => e.is_retryable(),
            Self::Queue(e) => e.is_retryable(),
            Self::Availability(e) => e.is_retryable(),
            Self::Snapshot(e) => e.is_retryable(),
            Self::Config(_) | Self::Internal(_) | Self::Cancelled => false,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::MetadataStore(MetadataStoreError::DuplicateKey {
                    message: db_err.to_string(),
                })
            }
            _ => Self::MetadataStore(MetadataStoreError::DatabaseError {
                message: err.to_string(),
            }),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Catalog(CatalogError::MalformedJson {
            message: err.to_string(),
        })
    }
}

/// Result type alias for `NuGet Trends` ingestion operations
pub type Result<T> = std::result::Result<T, Error>;
