use serde::{Deserialize, Serialize};

/// Events emitted while walking the catalog (components A and C).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CatalogEvent {
    /// The processor started a catalog walk from a given cursor position.
    WalkStarted { from_cursor: Option<String> },

    /// A catalog page was fetched and its leaf count observed.
    PageFetched { page_url: String, leaf_count: usize },

    /// A batch of leaves was applied to the metadata store.
    LeavesApplied {
        applied: usize,
        duplicates_detached: usize,
    },

    /// A single leaf fetch failed; the processor continues with the rest of the batch.
    LeafFetchFailed { leaf_url: String, error: String },

    /// The cursor was advanced past a processed page.
    CursorAdvanced { commit_timestamp: String },

    /// The walk reached the end of the catalog with nothing left to process.
    WalkCaughtUp,

    /// The walk stopped because of an unrecoverable error.
    WalkFailed { error: String },
}
