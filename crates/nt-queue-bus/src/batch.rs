//! The wire format for one queue message: a batch of lowercased package
//! ids, per §4.E / §6.

use nt_errors::{Error, QueueError};
use nt_types::DOWNLOAD_BATCH_SIZE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub package_ids_lower: Vec<String>,
}

impl Batch {
    #[must_use]
    pub fn new(package_ids_lower: Vec<String>) -> Self {
        Self { package_ids_lower }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.package_ids_lower.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.package_ids_lower.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.package_ids_lower.len() >= DOWNLOAD_BATCH_SIZE
    }

    /// # Errors
    ///
    /// Returns [`QueueError::EncodeFailed`] if bincode serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        bincode::serialize(self).map_err(|e| {
            QueueError::EncodeFailed {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// # Errors
    ///
    /// Returns [`QueueError::DecodeFailed`] if the payload isn't a valid
    /// encoded batch.
    pub fn decode(payload: &[u8]) -> Result<Self, Error> {
        bincode::deserialize(payload).map_err(|e| {
            QueueError::DecodeFailed {
                message: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bincode() {
        let batch = Batch::new(vec!["foo".to_string(), "bar".to_string()]);
        let encoded = batch.encode().unwrap();
        let decoded = Batch::decode(&encoded).unwrap();
        assert_eq!(batch, decoded);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Batch::decode(&[0xff, 0x00, 0x01]).is_err());
    }

    #[test]
    fn is_full_at_batch_size() {
        let ids: Vec<String> = (0..DOWNLOAD_BATCH_SIZE).map(|i| i.to_string()).collect();
        assert!(Batch::new(ids).is_full());
        assert!(!Batch::new(vec!["a".to_string()]).is_full());
    }
}
