#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Domain model shared across the `NuGet Trends` ingestion crates.
//!
//! These are plain records with no behavior of their own: the component
//! crates (catalog processor, metadata store, time-series store, snapshot
//! refreshers) own the operations that create, transform, and query them.
//! Polymorphism over catalog leaf shapes is a single tagged enum
//! ([`LeafKind`]), dispatched once where the catalog page is parsed.

mod tfm;

pub use tfm::{tfm_family, TfmFamily};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The two leaf shapes the upstream catalog publishes (§3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafKind {
    PackageDetails,
    PackageDelete,
}

/// A single dependency group as it appears in a `PackageDetails` leaf's
/// `dependencyGroups` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGroup {
    pub target_framework: Option<String>,
    #[serde(default)]
    pub dependency_ids: Vec<String>,
}

/// `PackageLeaf` (§3): one immutable row per `(package_id, package_version)`
/// ever observed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageLeaf {
    pub package_id: String,
    pub package_id_lower: String,
    pub package_version: String,
    pub commit_timestamp: DateTime<Utc>,
    pub published: DateTime<Utc>,
    pub listed: Option<bool>,
    pub icon_url: Option<String>,
    pub project_url: Option<String>,
    pub description: Option<String>,
    pub tags: BTreeSet<String>,
    pub authors: Option<String>,
    pub target_frameworks: BTreeSet<String>,
}

impl PackageLeaf {
    /// Enforce the §3 invariant `package_id_lower = lowercase(package_id)`.
    #[must_use]
    pub fn with_normalized_casing(mut self) -> Self {
        self.package_id_lower = self.package_id.to_lowercase();
        self
    }
}

/// `PackageDownload` (§3): the latest known total-download count for a
/// package, maintained by the download worker (component G).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDownload {
    pub package_id: String,
    pub package_id_lower: String,
    pub latest_download_count: Option<i64>,
    pub latest_download_checked_utc: DateTime<Utc>,
    pub icon_url: Option<String>,
}

/// Owned `DailyDownload` row (§3), used once a batch is assembled for
/// insertion into the time-series store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDownloadRow {
    pub package_id_lower: String,
    pub date: NaiveDate,
    pub download_count: u64,
}

/// `WeeklyDownload` (§3, derived): a Monday-keyed weekly average, scaled
/// by 7 to read as a weekly total at query time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDownload {
    pub week: NaiveDate,
    pub download_avg: f64,
}

impl WeeklyDownload {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn week_total(self) -> i64 {
        (self.download_avg * 7.0).round() as i64
    }
}

/// `PackageFirstSeen` (§3, derived).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFirstSeen {
    pub first_seen: NaiveDate,
}

/// `TrendingSnapshot` (§3): one row of the weekly trending recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingSnapshotRow {
    pub week: NaiveDate,
    pub package_id_lower: String,
    pub package_id_original: String,
    pub week_downloads: i64,
    pub comparison_week_downloads: i64,
    pub growth_rate: f64,
    pub icon_url: Option<String>,
    pub github_url: Option<String>,
    pub computed_at: DateTime<Utc>,
}

/// `TfmAdoptionSnapshot` (§3): one row of the monthly TFM adoption
/// recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfmAdoptionSnapshotRow {
    pub month: NaiveDate,
    pub tfm: String,
    pub family: TfmFamily,
    pub new_package_count: u32,
    pub cumulative_package_count: u32,
    pub computed_at: DateTime<Utc>,
}

/// The single named cursor row (`"catalog"`) persisted by the cursor
/// store (component B).
pub const CATALOG_CURSOR_NAME: &str = "catalog";

/// Number of lowercased package ids batched into one queue message
/// (§4.E, §6).
pub const DOWNLOAD_BATCH_SIZE: usize = 25;

/// Maximum age a queued batch is allowed before the broker expires it
/// (§4.E, §6).
pub const QUEUE_MESSAGE_TTL: std::time::Duration = std::time::Duration::from_secs(12 * 60 * 60);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_casing() {
        let leaf = PackageLeaf {
            package_id: "MyPackage".into(),
            package_id_lower: String::new(),
            package_version: "1.0.0".into(),
            commit_timestamp: Utc::now(),
            published: Utc::now(),
            listed: Some(true),
            icon_url: None,
            project_url: None,
            description: None,
            tags: BTreeSet::new(),
            authors: None,
            target_frameworks: BTreeSet::new(),
        }
        .with_normalized_casing();
        assert_eq!(leaf.package_id_lower, "mypackage");
    }

    #[test]
    fn weekly_total_scales_average_by_seven() {
        let weekly = WeeklyDownload {
            week: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            download_avg: 100.0,
        };
        assert_eq!(weekly.week_total(), 700);
    }
}
