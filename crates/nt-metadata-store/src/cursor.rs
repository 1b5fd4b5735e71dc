//! Cursor Store (component B): a single persisted point in time used by
//! the catalog processor to resume an incremental walk.

use chrono::{DateTime, Utc};
use nt_errors::Error;
use nt_types::CATALOG_CURSOR_NAME;
use sqlx::postgres::PgPool;
use sqlx::Row;

#[derive(Clone)]
pub struct CursorStore {
    pool: PgPool,
}

impl CursorStore {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read the current cursor value, or `None` if the catalog has never
    /// been processed.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get(&self) -> Result<Option<DateTime<Utc>>, Error> {
        let row = sqlx::query("SELECT value FROM cursors WHERE name = $1")
            .bind(CATALOG_CURSOR_NAME)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<DateTime<Utc>, _>("value")))
    }

    /// Persist `value` as the new cursor position. Per §4.C, the caller is
    /// responsible for only calling this after a batch of leaves up to
    /// `value` has been successfully applied.
    ///
    /// # Errors
    ///
    /// Returns a database error if the upsert fails.
    pub async fn set(&self, value: DateTime<Utc>) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO cursors (name, value) VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(CATALOG_CURSOR_NAME)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn unset_cursor_reads_as_none(pool: PgPool) {
        let store = CursorStore::new(pool);
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn set_then_get_round_trips(pool: PgPool) {
        let store = CursorStore::new(pool);
        let t = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();

        store.set(t).await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some(t));

        let t2 = DateTime::<Utc>::from_timestamp(1_700_000_100, 0).unwrap();
        store.set(t2).await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some(t2));
    }
}
