use serde::{Deserialize, Serialize};

/// Events emitted by the upstream availability gate (component J).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AvailabilityEvent {
    /// Upstream was marked unavailable after a qualifying outage signal.
    MarkedUnavailable { reason: String },

    /// A probe succeeded and upstream was marked available again.
    MarkedAvailable,

    /// A probe attempt failed while upstream was still in cooldown.
    ProbeFailed { error: String },
}
