#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Time-Series Store (component H).
//!
//! Backed by ClickHouse. `daily_download` is the append-only fact table
//! (replacing-on-key so repeated delivery of the same batch is a no-op);
//! `weekly_download` and `package_first_seen` are materialized views
//! derived automatically from it. `trending_snapshot` and
//! `tfm_adoption_snapshot` are written directly by the snapshot
//! refreshers (component I).

mod migrations;
mod rows;

pub use rows::{
    DailyDownloadInsert, FirstSeenRow, TfmAdoptionSnapshotInsert, TrendingSnapshotInsert,
    WeekTotalRow, WeeklyDownloadQueryRow,
};

use chrono::NaiveDate;
use clickhouse::Client;
use nt_errors::{Error, TimeseriesStoreError};
use nt_types::{TfmAdoptionSnapshotRow, TrendingSnapshotRow, WeeklyDownload};

#[derive(Clone)]
pub struct TimeseriesStore {
    client: Client,
}

impl TimeseriesStore {
    #[must_use]
    pub fn new(url: &str, database: &str) -> Self {
        let client = Client::default().with_url(url).with_database(database);
        Self { client }
    }

    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Apply every DDL statement. Idempotent; safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns [`TimeseriesStoreError::DatabaseError`] if any statement fails.
    pub async fn migrate(&self) -> Result<(), Error> {
        for sql in migrations::MIGRATIONS {
            self.client
                .query(sql)
                .execute()
                .await
                .map_err(|e| TimeseriesStoreError::DatabaseError {
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Append one day's worth of download-count rows (component G, H).
    ///
    /// # Errors
    ///
    /// Returns [`TimeseriesStoreError::InsertFailed`] if the insert fails
    /// partway through.
    pub async fn insert_daily(&self, rows: &[DailyDownloadInsert]) -> Result<(), Error> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut insert = self
            .client
            .insert::<DailyDownloadInsert>("daily_download")
            .await
            .map_err(|e| TimeseriesStoreError::InsertFailed {
                message: e.to_string(),
            })?;

        for row in rows {
            insert
                .write(row)
                .await
                .map_err(|e| TimeseriesStoreError::InsertFailed {
                    message: e.to_string(),
                })?;
        }

        insert.end().await.map_err(|e| TimeseriesStoreError::InsertFailed {
            message: e.to_string(),
        })?;

        Ok(())
    }

    /// Read the weekly download history for one package, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TimeseriesStoreError::QueryFailed`] if the query fails.
    pub async fn weekly_downloads(&self, package_id_lower: &str) -> Result<Vec<WeeklyDownload>, Error> {
        let rows: Vec<WeeklyDownloadQueryRow> = self
            .client
            .query(
                "SELECT week, avgMerge(download_avg_state) AS download_avg
                 FROM weekly_download
                 WHERE package_id_lower = ?
                 GROUP BY week
                 ORDER BY week",
            )
            .bind(package_id_lower)
            .fetch_all()
            .await
            .map_err(|e| TimeseriesStoreError::QueryFailed {
                message: e.to_string(),
            })?;

        Ok(rows
            .into_iter()
            .map(|r| WeeklyDownload {
                week: r.week,
                download_avg: r.download_avg,
            })
            .collect())
    }

    /// Sum of daily downloads per package for the 7-day window starting at
    /// `week_monday`, used by the trending refresher (component I) to
    /// compare this week against the comparison week.
    ///
    /// # Errors
    ///
    /// Returns [`TimeseriesStoreError::QueryFailed`] if the query fails.
    pub async fn week_totals(&self, week_monday: NaiveDate) -> Result<Vec<WeekTotalRow>, Error> {
        let week_end = week_monday + chrono::Duration::days(7);
        self.client
            .query(
                "SELECT package_id_lower, toInt64(sum(download_count)) AS total
                 FROM daily_download
                 WHERE date >= ? AND date < ?
                 GROUP BY package_id_lower",
            )
            .bind(week_monday)
            .bind(week_end)
            .fetch_all()
            .await
            .map_err(|e| {
                TimeseriesStoreError::QueryFailed {
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// First week a package appeared in `weekly_download`, used by the
    /// trending refresher to exclude brand-new packages from growth-rate
    /// comparisons against a nonexistent prior week.
    ///
    /// # Errors
    ///
    /// Returns [`TimeseriesStoreError::QueryFailed`] if the query fails.
    pub async fn first_seen(&self, package_id_lower: &str) -> Result<Option<NaiveDate>, Error> {
        let rows: Vec<FirstSeenRow> = self
            .client
            .query(
                "SELECT minMerge(first_seen_state) AS first_seen
                 FROM package_first_seen
                 WHERE package_id_lower = ?",
            )
            .bind(package_id_lower)
            .fetch_all()
            .await
            .map_err(|e| TimeseriesStoreError::QueryFailed {
                message: e.to_string(),
            })?;

        Ok(rows.into_iter().next().map(|r| r.first_seen))
    }

    /// Write one week's worth of trending snapshot rows (component I).
    ///
    /// # Errors
    ///
    /// Returns [`TimeseriesStoreError::InsertFailed`] if the insert fails.
    pub async fn write_trending_snapshot(&self, rows: &[TrendingSnapshotRow]) -> Result<(), Error> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut insert = self
            .client
            .insert::<TrendingSnapshotInsert>("trending_snapshot")
            .await
            .map_err(|e| TimeseriesStoreError::InsertFailed {
                message: e.to_string(),
            })?;

        for row in rows {
            let wire = TrendingSnapshotInsert {
                week: row.week,
                package_id_lower: row.package_id_lower.clone(),
                package_id_original: row.package_id_original.clone(),
                week_downloads: row.week_downloads,
                comparison_week_downloads: row.comparison_week_downloads,
                growth_rate: row.growth_rate,
                icon_url: row.icon_url.clone(),
                github_url: row.github_url.clone(),
                computed_at: row.computed_at,
            };
            insert
                .write(&wire)
                .await
                .map_err(|e| TimeseriesStoreError::InsertFailed {
                    message: e.to_string(),
                })?;
        }

        insert.end().await.map_err(|e| TimeseriesStoreError::InsertFailed {
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Write one month's worth of TFM adoption snapshot rows (component I).
    ///
    /// # Errors
    ///
    /// Returns [`TimeseriesStoreError::InsertFailed`] if the insert fails.
    pub async fn write_tfm_snapshot(&self, rows: &[TfmAdoptionSnapshotRow]) -> Result<(), Error> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut insert = self
            .client
            .insert::<TfmAdoptionSnapshotInsert>("tfm_adoption_snapshot")
            .await
            .map_err(|e| TimeseriesStoreError::InsertFailed {
                message: e.to_string(),
            })?;

        for row in rows {
            let wire = TfmAdoptionSnapshotInsert {
                month: row.month,
                tfm: row.tfm.clone(),
                family: row.family.as_str().to_string(),
                new_package_count: row.new_package_count,
                cumulative_package_count: row.cumulative_package_count,
                computed_at: row.computed_at,
            };
            insert
                .write(&wire)
                .await
                .map_err(|e| TimeseriesStoreError::InsertFailed {
                    message: e.to_string(),
                })?;
        }

        insert.end().await.map_err(|e| TimeseriesStoreError::InsertFailed {
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_monday_window_spans_seven_days() {
        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let end = monday + chrono::Duration::days(7);
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
    }
}
