//! Network-related error types, shared by the catalog client and the
//! per-package download-count lookups.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

const HINT_CHECK_UPSTREAM: &str = "Check upstream availability and retry.";

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("TLS error: {0}")]
    TlsError(String),

    #[error("upstream unavailable")]
    UpstreamUnavailable,

    #[error("rate limited: retry after {seconds} seconds")]
    RateLimited { seconds: u64 },
}

impl NetworkError {
    /// §4.G / §7: a batch of failures this shape indicates a general
    /// outage and should flip the availability gate, rather than a
    /// per-id `NotFound`.
    #[must_use]
    pub fn indicates_outage(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ConnectionRefused(_) | Self::TlsError(_) | Self::UpstreamUnavailable
        ) || matches!(self, Self::HttpError { status, .. } if *status >= 500)
    }
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } | Self::UpstreamUnavailable => Some(HINT_CHECK_UPSTREAM),
            Self::RateLimited { .. } => Some("Back off until the rate-limit window expires."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::RequestFailed(_)
                | Self::ConnectionRefused(_)
                | Self::TlsError(_)
                | Self::UpstreamUnavailable
                | Self::RateLimited { .. }
        ) || matches!(self, Self::HttpError { status, .. } if *status >= 500)
    }
}
