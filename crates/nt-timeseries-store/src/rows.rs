//! Wire row types for the ClickHouse tables. Kept separate from
//! `nt-types`'s plain domain records since the on-wire shape (flat fields,
//! `clickhouse::Row`) differs from the in-memory one.

use clickhouse::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct DailyDownloadInsert {
    pub package_id_lower: String,
    #[serde(with = "clickhouse::serde::chrono::date")]
    pub date: chrono::NaiveDate,
    pub download_count: u64,
}

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct WeeklyDownloadQueryRow {
    #[serde(with = "clickhouse::serde::chrono::date")]
    pub week: chrono::NaiveDate,
    pub download_avg: f64,
}

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct WeekTotalRow {
    pub package_id_lower: String,
    pub total: i64,
}

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct FirstSeenRow {
    #[serde(with = "clickhouse::serde::chrono::date")]
    pub first_seen: chrono::NaiveDate,
}

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct TrendingSnapshotInsert {
    #[serde(with = "clickhouse::serde::chrono::date")]
    pub week: chrono::NaiveDate,
    pub package_id_lower: String,
    pub package_id_original: String,
    pub week_downloads: i64,
    pub comparison_week_downloads: i64,
    pub growth_rate: f64,
    pub icon_url: Option<String>,
    pub github_url: Option<String>,
    #[serde(with = "clickhouse::serde::chrono::datetime64::millis")]
    pub computed_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct TfmAdoptionSnapshotInsert {
    #[serde(with = "clickhouse::serde::chrono::date")]
    pub month: chrono::NaiveDate,
    pub tfm: String,
    pub family: String,
    pub new_package_count: u32,
    pub cumulative_package_count: u32,
    #[serde(with = "clickhouse::serde::chrono::datetime64::millis")]
    pub computed_at: chrono::DateTime<chrono::Utc>,
}
