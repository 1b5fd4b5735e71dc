#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Snapshot Refreshers (component I).
//!
//! Two weekly jobs — trending and TFM adoption — that recompute a
//! derived table in the time-series store from the raw daily/leaf data.
//! Each job acquires a Postgres advisory lock (§10.5) before running so
//! at most one instance of a given job runs at a time; a tick that
//! cannot acquire the lock skips rather than waiting.

mod tfm;
mod trending;

pub use tfm::TfmRefresher;
pub use trending::TrendingRefresher;

use nt_errors::Error;
use nt_events::{AppEvent, EventSender, SnapshotEvent};
use nt_metadata_store::MetadataStore;
use std::future::Future;

/// Job names used as advisory-lock keys and in emitted events.
pub const TRENDING_JOB_NAME: &str = "trending-refresh";
pub const TFM_JOB_NAME: &str = "tfm-refresh";

/// Outcome of one scheduled tick of a refresher job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Completed { rows_written: usize },
    SkippedLocked,
}

/// Run `job` under the named job's exclusivity lock, emitting the
/// Idle -> Running -> (Completed | Failed) events from §4.I's state
/// machine. A locked-out tick returns `SkippedLocked` rather than an
/// error; the caller's next scheduled tick retries.
///
/// # Errors
///
/// Returns whatever error `job` returns, after emitting `JobFailed`.
pub async fn run_locked_job<F, Fut>(
    metadata: &MetadataStore,
    job_name: &str,
    tx: &EventSender,
    job: F,
) -> Result<JobOutcome, Error>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<usize, Error>>,
{
    let Some(lock) = metadata.try_acquire_job_lock(job_name).await? else {
        let _ = tx.send(AppEvent::Snapshot(SnapshotEvent::JobSkippedLocked {
            job_name: job_name.to_string(),
        }));
        return Ok(JobOutcome::SkippedLocked);
    };

    let _ = tx.send(AppEvent::Snapshot(SnapshotEvent::JobStarted {
        job_name: job_name.to_string(),
    }));

    let result = job().await;
    lock.release().await;

    match result {
        Ok(rows_written) => {
            let _ = tx.send(AppEvent::Snapshot(SnapshotEvent::JobCompleted {
                job_name: job_name.to_string(),
                rows_written,
            }));
            Ok(JobOutcome::Completed { rows_written })
        }
        Err(error) => {
            let _ = tx.send(AppEvent::Snapshot(SnapshotEvent::JobFailed {
                job_name: job_name.to_string(),
                error: error.to_string(),
            }));
            Err(error)
        }
    }
}
