//! Catalog mirror error types (components A and C)

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum CatalogError {
    #[error("malformed catalog document: {message}")]
    MalformedJson { message: String },

    #[error("catalog service index has no Catalog/3.0.0 entry")]
    MissingCatalogEntry,

    #[error("catalog leaf missing required field: {field}")]
    MissingField { field: String },

    #[error("unknown leaf type: {type_name}")]
    UnknownLeafType { type_name: String },

    #[error("cursor store I/O failed: {message}")]
    CursorIo { message: String },
}

impl UserFacingError for CatalogError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MalformedJson { .. } | Self::MissingField { .. } => {
                Some("The upstream document shape may have changed; inspect the raw response.")
            }
            Self::CursorIo { .. } => Some("The next scheduled tick will retry from the same cursor."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        // Malformed pages/leaves abort the page per §7; the cursor store
        // I/O failure is the only catalog-domain error a retry can fix.
        matches!(self, Self::CursorIo { .. })
    }
}
