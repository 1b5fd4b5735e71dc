//! Metadata Store (component D), catalog-leaf side: the deduplicated
//! `(package_id, package_version)` table built by the catalog processor.

use chrono::NaiveDate;
use nt_errors::Error;
use nt_types::PackageLeaf;
use sqlx::postgres::PgPool;
use sqlx::Row;

/// Enrichment fields the trending refresher (component I) attaches to a
/// survivor before writing `TrendingSnapshot` (§4.I step 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    pub package_id_original: String,
    pub icon_url: Option<String>,
    pub project_url: Option<String>,
}

/// One (month, tfm) pair drawn from a package's first-ever listed
/// version, the raw material for the TFM adoption refresher (§4.I).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTfmListing {
    pub month: NaiveDate,
    pub tfm: String,
}

#[derive(Clone)]
pub struct LeavesStore {
    pool: PgPool,
}

/// Outcome of applying one batch of leaves, per §4.C step 4 / §10.3
/// counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub details_applied: usize,
    pub duplicates_detached: usize,
    pub deletes_applied: usize,
}

impl LeavesStore {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply a batch of `PackageDetails` leaves and a batch of
    /// `PackageDelete` package ids atomically.
    ///
    /// Re-observations of an already-present `(package_id, version)` key
    /// are skipped rather than erroring (§3: "not updated thereafter").
    /// Deletes remove the leaf rows for a package id; per §10.7 this does
    /// not purge `DailyDownload` history in the time-series store.
    ///
    /// # Errors
    ///
    /// Returns a database error if the transaction cannot be committed.
    pub async fn apply_batch(
        &self,
        details: &[PackageLeaf],
        deletes: &[String],
    ) -> Result<ApplyOutcome, Error> {
        let mut tx = self.pool.begin().await?;
        let mut outcome = ApplyOutcome::default();

        for leaf in details {
            let tags: Vec<String> = leaf.tags.iter().cloned().collect();
            let target_frameworks: Vec<String> = leaf.target_frameworks.iter().cloned().collect();

            let result = sqlx::query(
                r"
                INSERT INTO package_details_catalog_leafs
                    (package_id, package_id_lower, package_version, commit_timestamp,
                     published, listed, icon_url, project_url, description, tags,
                     authors, target_frameworks)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (package_id, package_version) DO NOTHING
                ",
            )
            .bind(&leaf.package_id)
            .bind(&leaf.package_id_lower)
            .bind(&leaf.package_version)
            .bind(leaf.commit_timestamp)
            .bind(leaf.published)
            .bind(leaf.listed)
            .bind(&leaf.icon_url)
            .bind(&leaf.project_url)
            .bind(&leaf.description)
            .bind(&tags)
            .bind(&leaf.authors)
            .bind(&target_frameworks)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                outcome.duplicates_detached += 1;
            } else {
                outcome.details_applied += 1;
            }
        }

        for package_id in deletes {
            let result = sqlx::query("DELETE FROM package_details_catalog_leafs WHERE package_id = $1")
                .bind(package_id)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() > 0 {
                outcome.deletes_applied += 1;
            }

            sqlx::query("DELETE FROM package_downloads WHERE package_id = $1")
                .bind(package_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(outcome)
    }

    /// Count distinct `package_id_lower` values tracked by the catalog
    /// mirror; used for coarse progress reporting.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn distinct_package_count(&self) -> Result<i64, Error> {
        let row = sqlx::query(
            "SELECT COUNT(DISTINCT package_id_lower) AS n FROM package_details_catalog_leafs",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("n"))
    }

    /// Current display casing, icon, and project URL for a package, drawn
    /// from its most recently committed leaf. Used to enrich trending
    /// snapshot rows (§4.I step 3).
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn latest_metadata_for(
        &self,
        package_id_lower: &str,
    ) -> Result<Option<PackageSummary>, Error> {
        let row = sqlx::query(
            "SELECT package_id, icon_url, project_url
             FROM package_details_catalog_leafs
             WHERE package_id_lower = $1
             ORDER BY commit_timestamp DESC
             LIMIT 1",
        )
        .bind(package_id_lower)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| PackageSummary {
            package_id_original: r.get("package_id"),
            icon_url: r.get("icon_url"),
            project_url: r.get("project_url"),
        }))
    }

    /// For every package, find its first-ever-listed version (earliest
    /// `published` across all rows sharing its `package_id_lower`) and
    /// return one row per target framework it declares, tagged with the
    /// month that version was published.
    ///
    /// This is the raw material for the TFM adoption refresher (§4.I):
    /// grouping the result by `(month, tfm)` and counting rows gives the
    /// count of packages newly adopting that tfm in that month.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn monthly_tfm_first_listings(&self) -> Result<Vec<MonthlyTfmListing>, Error> {
        let rows = sqlx::query(
            "WITH first_version AS (
                 SELECT DISTINCT ON (package_id_lower)
                     package_id_lower, published, target_frameworks
                 FROM package_details_catalog_leafs
                 ORDER BY package_id_lower, published ASC
             )
             SELECT date_trunc('month', published)::date AS month,
                    unnest(target_frameworks) AS tfm
             FROM first_version",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| MonthlyTfmListing {
                month: r.get("month"),
                tfm: r.get("tfm"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn leaf(id: &str, version: &str) -> PackageLeaf {
        PackageLeaf {
            package_id: id.to_string(),
            package_id_lower: id.to_lowercase(),
            package_version: version.to_string(),
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
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn reapplying_same_key_is_detached_not_erroring(pool: PgPool) {
        let store = LeavesStore::new(pool);
        let first = store.apply_batch(&[leaf("Foo", "1.0.0")], &[]).await.unwrap();
        assert_eq!(first.details_applied, 1);
        assert_eq!(first.duplicates_detached, 0);

        let second = store.apply_batch(&[leaf("Foo", "1.0.0")], &[]).await.unwrap();
        assert_eq!(second.details_applied, 0);
        assert_eq!(second.duplicates_detached, 1);

        assert_eq!(store.distinct_package_count().await.unwrap(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_removes_leaf_rows(pool: PgPool) {
        let store = LeavesStore::new(pool);
        store.apply_batch(&[leaf("Foo", "1.0.0")], &[]).await.unwrap();

        let outcome = store
            .apply_batch(&[], &["Foo".to_string()])
            .await
            .unwrap();
        assert_eq!(outcome.deletes_applied, 1);
        assert_eq!(store.distinct_package_count().await.unwrap(), 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn latest_metadata_reflects_the_newest_commit(pool: PgPool) {
        let store = LeavesStore::new(pool);
        let mut first = leaf("Foo", "1.0.0");
        first.icon_url = Some("https://example.test/old.png".to_string());
        store.apply_batch(&[first], &[]).await.unwrap();

        let mut second = leaf("Foo", "2.0.0");
        second.commit_timestamp = Utc::now() + chrono::Duration::seconds(1);
        second.icon_url = Some("https://example.test/new.png".to_string());
        store.apply_batch(&[second], &[]).await.unwrap();

        let summary = store.latest_metadata_for("foo").await.unwrap().unwrap();
        assert_eq!(summary.icon_url.as_deref(), Some("https://example.test/new.png"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn monthly_tfm_listings_tag_the_first_version_only(pool: PgPool) {
        let store = LeavesStore::new(pool);
        let mut first = leaf("Foo", "1.0.0");
        first.published = chrono::DateTime::parse_from_rfc3339("2024-03-15T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        first.target_frameworks = BTreeSet::from(["net6.0".to_string()]);
        store.apply_batch(&[first], &[]).await.unwrap();

        let mut second = leaf("Foo", "2.0.0");
        second.published = chrono::DateTime::parse_from_rfc3339("2024-09-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        second.target_frameworks = BTreeSet::from(["net8.0".to_string()]);
        store.apply_batch(&[second], &[]).await.unwrap();

        let listings = store.monthly_tfm_first_listings().await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].tfm, "net6.0");
        assert_eq!(listings[0].month, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
