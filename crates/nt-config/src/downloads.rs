//! Daily download pipeline configuration (§6, components F and G)

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadsConfig {
    pub worker_count: usize,
    pub batch_size: usize,
    #[serde(with = "humantime_secs")]
    pub per_request_timeout: Duration,
    /// Fan-out width for concurrent upstream lookups within one batch
    /// (§4.G: "per process N≈25").
    pub lookup_concurrency: usize,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            worker_count: 1,
            batch_size: 25,
            per_request_timeout: Duration::from_secs(30),
            lookup_concurrency: 25,
        }
    }
}

mod humantime_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
