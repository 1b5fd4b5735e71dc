//! Upstream availability gate configuration (§6, component J)

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    pub cooldown_secs: u64,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self { cooldown_secs: 5 * 60 }
    }
}

impl AvailabilityConfig {
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}
