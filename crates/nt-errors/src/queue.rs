//! Durable queue (component E) error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum QueueError {
    #[error("failed to connect to broker: {message}")]
    ConnectFailed { message: String },

    #[error("broker connection lost: {message}")]
    Disconnected { message: String },

    #[error("failed to publish batch: {message}")]
    PublishFailed { message: String },

    #[error("failed to ack/nack message: {message}")]
    AckFailed { message: String },

    #[error("failed to encode batch payload: {message}")]
    EncodeFailed { message: String },

    #[error("failed to decode batch payload: {message}")]
    DecodeFailed { message: String },
}

impl UserFacingError for QueueError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ConnectFailed { .. } | Self::Disconnected { .. } => {
                Some("Workers reconnect with bounded backoff; in-flight messages redeliver.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailed { .. } | Self::Disconnected { .. } | Self::AckFailed { .. }
        )
    }
}
