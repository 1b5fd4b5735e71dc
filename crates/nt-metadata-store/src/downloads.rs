//! Metadata Store (component D), download side: latest per-package
//! download counts, and the streaming candidate query used by the
//! downloads publisher (component F).

use chrono::{NaiveDate, Utc};
use futures::stream::{Stream, StreamExt};
use nt_errors::Error;
use nt_types::PackageDownload;
use sqlx::postgres::PgPool;
use sqlx::Row;

#[derive(Clone)]
pub struct DownloadsStore {
    pool: PgPool,
}

impl DownloadsStore {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stream every `package_id_lower` whose `PackageDownload` row is
    /// stale (checked before today UTC) or absent entirely.
    ///
    /// Streaming, not collecting: per §4.D the candidate set does not fit
    /// in memory for the full catalog.
    pub fn stream_pending_today(&self, today: NaiveDate) -> impl Stream<Item = Result<String, Error>> + '_ {
        let start_of_day = today.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();

        sqlx::query(
            r"
            SELECT l.package_id_lower AS package_id_lower
            FROM (SELECT DISTINCT package_id_lower FROM package_details_catalog_leafs) l
            LEFT JOIN package_downloads d ON d.package_id_lower = l.package_id_lower
            WHERE d.package_id_lower IS NULL
               OR d.latest_download_checked_utc < $1
            ",
        )
        .bind(start_of_day)
        .fetch(&self.pool)
        .map(|row| row.map(|r| r.get::<String, _>("package_id_lower")).map_err(Error::from))
    }

    /// Upsert the latest known download count for one package, keyed on
    /// `package_id_lower`. Repeated delivery of the same batch is a no-op
    /// except for the `latest_download_checked_utc` timestamp, per §4.G.
    ///
    /// # Errors
    ///
    /// Returns a database error if the upsert fails.
    pub async fn upsert(&self, download: &PackageDownload) -> Result<(), Error> {
        sqlx::query(
            r"
            INSERT INTO package_downloads
                (package_id, package_id_lower, latest_download_count,
                 latest_download_checked_utc, icon_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (package_id_lower) DO UPDATE SET
                latest_download_count = EXCLUDED.latest_download_count,
                latest_download_checked_utc = EXCLUDED.latest_download_checked_utc,
                icon_url = EXCLUDED.icon_url
            ",
        )
        .bind(&download.package_id)
        .bind(&download.package_id_lower)
        .bind(download.latest_download_count)
        .bind(download.latest_download_checked_utc)
        .bind(&download.icon_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up the latest recorded download count for a package, by its
    /// lowercased id.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get(&self, package_id_lower: &str) -> Result<Option<PackageDownload>, Error> {
        let row = sqlx::query(
            "SELECT package_id, package_id_lower, latest_download_count,
                    latest_download_checked_utc, icon_url
             FROM package_downloads WHERE package_id_lower = $1",
        )
        .bind(package_id_lower)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| PackageDownload {
            package_id: r.get("package_id"),
            package_id_lower: r.get("package_id_lower"),
            latest_download_count: r.get("latest_download_count"),
            latest_download_checked_utc: r.get("latest_download_checked_utc"),
            icon_url: r.get("icon_url"),
        }))
    }
}

#[must_use]
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LeavesStore;
    use chrono::{TimeZone, Utc};

    fn leaf(id: &str) -> nt_types::PackageLeaf {
        nt_types::PackageLeaf {
            package_id: id.to_string(),
            package_id_lower: id.to_lowercase(),
            package_version: "1.0.0".to_string(),
            commit_timestamp: Utc::now(),
            published: Utc::now(),
            listed: Some(true),
            icon_url: None,
            project_url: None,
            description: None,
            tags: Default::default(),
            authors: None,
            target_frameworks: Default::default(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn packages_with_no_download_row_are_pending(pool: PgPool) {
        LeavesStore::new(pool.clone())
            .apply_batch(&[leaf("Foo")], &[])
            .await
            .unwrap();

        let store = DownloadsStore::new(pool);
        let today = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap().date_naive();
        let pending: Vec<String> = store
            .stream_pending_today(today)
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert_eq!(pending, vec!["foo".to_string()]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn packages_checked_today_are_not_pending(pool: PgPool) {
        LeavesStore::new(pool.clone())
            .apply_batch(&[leaf("Foo")], &[])
            .await
            .unwrap();

        let store = DownloadsStore::new(pool);
        let today = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

        store
            .upsert(&PackageDownload {
                package_id: "Foo".to_string(),
                package_id_lower: "foo".to_string(),
                latest_download_count: Some(10),
                latest_download_checked_utc: today,
                icon_url: None,
            })
            .await
            .unwrap();

        let pending: Vec<String> = store
            .stream_pending_today(today.date_naive())
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert!(pending.is_empty());
    }
}
