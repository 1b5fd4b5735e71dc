//! Upstream availability gate (component J) error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum AvailabilityError {
    #[error("upstream currently marked unavailable, cooldown has not elapsed")]
    Unavailable,
}

impl UserFacingError for AvailabilityError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("Requeue the message; the gate auto-resets after the cooldown elapses.")
    }

    fn is_retryable(&self) -> bool {
        true
    }
}
