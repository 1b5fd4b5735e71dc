#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Metadata Store (component D) and Cursor Store (component B).
//!
//! Backed by PostgreSQL. Queries are written against the runtime
//! `sqlx::query`/`query_as` API rather than the compile-time `query!`
//! macro family, since this crate is built without a live `DATABASE_URL`.

pub mod cursor;
pub mod downloads;
pub mod job_lock;
pub mod leaves;

pub use cursor::CursorStore;
pub use downloads::DownloadsStore;
pub use job_lock::JobLock;
pub use leaves::{LeavesStore, MonthlyTfmListing, PackageSummary};

use nt_errors::Error;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Handle to the PostgreSQL-backed metadata store.
///
/// Cheap to clone: wraps a connection pool shared by every component that
/// reads or writes catalog metadata (C, D, F).
#[derive(Clone)]
pub struct MetadataStore {
    pool: PgPool,
}

impl MetadataStore {
    /// Connect to `database_url` and establish a bounded connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`nt_errors::MetadataStoreError::DatabaseError`] if the pool
    /// cannot be established.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Build a store around an already-connected pool (used by tests).
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply all pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`nt_errors::MetadataStoreError::MigrationFailed`] if any
    /// migration fails to apply.
    pub async fn migrate(&self) -> Result<(), Error> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| nt_errors::MetadataStoreError::MigrationFailed {
                message: e.to_string(),
            })?;
        Ok(())
    }

    #[must_use]
    pub fn cursor(&self) -> CursorStore {
        CursorStore::new(self.pool.clone())
    }

    #[must_use]
    pub fn leaves(&self) -> LeavesStore {
        LeavesStore::new(self.pool.clone())
    }

    #[must_use]
    pub fn downloads(&self) -> DownloadsStore {
        DownloadsStore::new(self.pool.clone())
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Attempt to acquire the named job's exclusivity lock (§10.5).
    ///
    /// # Errors
    ///
    /// Returns a database error if the lock attempt cannot be made.
    pub async fn try_acquire_job_lock(&self, job_name: &str) -> Result<Option<JobLock>, Error> {
        JobLock::try_acquire(&self.pool, job_name).await
    }
}
