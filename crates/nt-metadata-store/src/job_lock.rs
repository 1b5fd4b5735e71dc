//! Job exclusivity via Postgres advisory locks (§10.5).
//!
//! Each named scheduler job (catalog walk, downloads publish, trending
//! refresh, TFM refresh) acquires a session-scoped advisory lock keyed by
//! a stable hash of its name before running. A tick that cannot acquire
//! the lock skips rather than waiting, so a slow previous run never
//! backs up the scheduler.

use nt_errors::Error;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{pool::PoolConnection, Row};

/// Holds an advisory lock for as long as it is alive. The lock is
/// released by closing the underlying connection rather than returning
/// it to the pool, so it never leaks onto a connection some other
/// caller later reuses.
pub struct JobLock {
    conn: Option<PoolConnection<Postgres>>,
}

impl JobLock {
    /// Attempt to acquire the named job's lock. Returns `None` if another
    /// instance already holds it.
    ///
    /// # Errors
    ///
    /// Returns a database error if the lock attempt cannot be made.
    pub async fn try_acquire(pool: &PgPool, job_name: &str) -> Result<Option<Self>, Error> {
        let key = stable_job_key(job_name);
        let mut conn = pool.acquire().await?;

        let row = sqlx::query("SELECT pg_try_advisory_lock($1) AS locked")
            .bind(key)
            .fetch_one(&mut *conn)
            .await?;

        if row.get::<bool, _>("locked") {
            Ok(Some(Self { conn: Some(conn) }))
        } else {
            Ok(None)
        }
    }

    /// Release the lock by closing its connection.
    pub async fn release(mut self) {
        if let Some(conn) = self.conn.take() {
            let _ = conn.close().await;
        }
    }
}

impl Drop for JobLock {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tokio::spawn(async move {
                let _ = conn.close().await;
            });
        }
    }
}

/// FNV-1a over the job name, truncated to `i64` for `pg_advisory_lock`'s
/// bigint key. Deterministic across builds and processes, unlike
/// `std::hash::DefaultHasher`.
fn stable_job_key(job_name: &str) -> i64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in job_name.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
    }
    #[allow(clippy::cast_possible_wrap)]
    {
        hash as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_hashes_to_the_same_key() {
        assert_eq!(stable_job_key("trending-refresh"), stable_job_key("trending-refresh"));
    }

    #[test]
    fn different_names_hash_differently() {
        assert_ne!(stable_job_key("trending-refresh"), stable_job_key("tfm-refresh"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn second_acquire_is_blocked_until_the_first_releases(pool: PgPool) {
        let first = JobLock::try_acquire(&pool, "catalog-walk").await.unwrap();
        assert!(first.is_some());

        let second = JobLock::try_acquire(&pool, "catalog-walk").await.unwrap();
        assert!(second.is_none());

        first.unwrap().release().await;

        let third = JobLock::try_acquire(&pool, "catalog-walk").await.unwrap();
        assert!(third.is_some());
    }
}
