//! Catalog client/processor configuration (§6, components A and C)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_SERVICE_INDEX_URL: &str = "https://api.nuget.org/v3/index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub service_index_url: String,
    pub min_commit_timestamp: Option<DateTime<Utc>>,
    pub max_commit_timestamp: Option<DateTime<Utc>>,
    pub exclude_redundant_leaves: bool,
    /// Concurrent leaf fetches per page (§5: fixed at 25 in practice, but
    /// left configurable for tests).
    pub leaf_fetch_concurrency: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            service_index_url: DEFAULT_SERVICE_INDEX_URL.to_string(),
            min_commit_timestamp: None,
            max_commit_timestamp: None,
            exclude_redundant_leaves: true,
            leaf_fetch_concurrency: 25,
        }
    }
}
