//! Trending refresher (§4.I): weekly recompute of `TrendingSnapshot`.

use crate::{run_locked_job, JobOutcome, TRENDING_JOB_NAME};
use chrono::{Datelike, Duration, Months, NaiveDate, Utc, Weekday};
use futures::stream::{self, StreamExt};
use nt_errors::Error;
use nt_events::{EventEmitter, EventSender};
use nt_metadata_store::MetadataStore;
use nt_timeseries_store::TimeseriesStore;
use nt_types::TrendingSnapshotRow;
use std::collections::HashMap;

/// A package must clear this many downloads in the data week to be
/// considered (§4.I step 2).
const MIN_WEEK_DOWNLOADS: i64 = 1000;

/// At most this many survivors are kept, ordered by growth rate.
const MAX_SNAPSHOT_ROWS: usize = 1000;

/// Concurrency for the per-package `first_seen` lookups.
const FIRST_SEEN_CONCURRENCY: usize = 16;

pub struct TrendingRefresher {
    metadata: MetadataStore,
    timeseries: TimeseriesStore,
    tx: EventSender,
}

impl EventEmitter for TrendingRefresher {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl TrendingRefresher {
    #[must_use]
    pub fn new(metadata: MetadataStore, timeseries: TimeseriesStore, tx: EventSender) -> Self {
        Self {
            metadata,
            timeseries,
            tx,
        }
    }

    /// Run one scheduled tick.
    ///
    /// # Errors
    ///
    /// Returns an error if any query or write fails; the caller's next
    /// scheduled tick restarts from scratch (snapshot writes are
    /// replacing, so partial progress is never visible as stale).
    pub async fn run(&self) -> Result<JobOutcome, Error> {
        let metadata = self.metadata.clone();
        let timeseries = self.timeseries.clone();
        run_locked_job(&self.metadata, TRENDING_JOB_NAME, &self.tx, || async move {
            compute_and_write(&metadata, &timeseries).await
        })
        .await
    }
}

async fn compute_and_write(metadata: &MetadataStore, timeseries: &TimeseriesStore) -> Result<usize, Error> {
    let now = Utc::now();
    let data_week = monday_of(now.date_naive() - Duration::days(7));
    let comparison_week = data_week - Duration::days(7);
    let age_cutoff = now
        .date_naive()
        .checked_sub_months(Months::new(12))
        .unwrap_or(data_week);

    let cur_totals = totals_by_package(timeseries, data_week).await?;
    let prev_totals = totals_by_package(timeseries, comparison_week).await?;

    let mut candidates: Vec<(String, i64, i64)> = cur_totals
        .into_iter()
        .filter_map(|(id, week_downloads)| {
            let comparison_downloads = *prev_totals.get(&id)?;
            if week_downloads >= MIN_WEEK_DOWNLOADS && comparison_downloads > 0 {
                Some((id, week_downloads, comparison_downloads))
            } else {
                None
            }
        })
        .collect();

    let first_seens = stream::iter(candidates.iter().map(|(id, _, _)| id.clone()))
        .map(|id| {
            let timeseries = timeseries.clone();
            async move {
                let first_seen = timeseries.first_seen(&id).await;
                (id, first_seen)
            }
        })
        .buffer_unordered(FIRST_SEEN_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

    let first_seen_by_id: HashMap<String, NaiveDate> = first_seens
        .into_iter()
        .filter_map(|(id, result)| result.ok().flatten().map(|d| (id, d)))
        .collect();

    candidates.retain(|(id, _, _)| {
        first_seen_by_id
            .get(id)
            .is_some_and(|first_seen| *first_seen >= age_cutoff)
    });

    let mut scored: Vec<(String, i64, i64, f64)> = candidates
        .into_iter()
        .map(|(id, week_downloads, comparison_downloads)| {
            #[allow(clippy::cast_precision_loss)]
            let growth_rate =
                (week_downloads - comparison_downloads) as f64 / comparison_downloads as f64;
            (id, week_downloads, comparison_downloads, growth_rate)
        })
        .collect();

    scored.sort_by(|a, b| b.3.total_cmp(&a.3));
    scored.truncate(MAX_SNAPSHOT_ROWS);

    let computed_at = now;
    let mut rows = Vec::with_capacity(scored.len());
    for (package_id_lower, week_downloads, comparison_week_downloads, growth_rate) in scored {
        let summary = metadata.leaves().latest_metadata_for(&package_id_lower).await?;
        let (package_id_original, icon_url, github_url) = match summary {
            Some(s) => {
                let github_url = s
                    .project_url
                    .as_deref()
                    .filter(|url| url.contains("github.com"))
                    .map(ToString::to_string);
                (s.package_id_original, s.icon_url, github_url)
            }
            None => (package_id_lower.clone(), None, None),
        };

        rows.push(TrendingSnapshotRow {
            week: data_week,
            package_id_lower,
            package_id_original,
            week_downloads,
            comparison_week_downloads,
            growth_rate,
            icon_url,
            github_url,
            computed_at,
        });
    }

    let rows_written = rows.len();
    timeseries.write_trending_snapshot(&rows).await?;
    Ok(rows_written)
}

async fn totals_by_package(
    timeseries: &TimeseriesStore,
    week_monday: NaiveDate,
) -> Result<HashMap<String, i64>, Error> {
    Ok(timeseries
        .week_totals(week_monday)
        .await?
        .into_iter()
        .map(|row| (row.package_id_lower, row.total))
        .collect())
}

/// The Monday on or before `date`.
fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monday_of_a_monday_is_itself() {
        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(monday_of(monday), monday);
    }

    #[test]
    fn monday_of_a_sunday_is_the_preceding_monday() {
        let sunday = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();
        assert_eq!(monday_of(sunday), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn growth_rate_reflects_relative_change() {
        let week_downloads = 1500i64;
        let comparison_downloads = 1000i64;
        #[allow(clippy::cast_precision_loss)]
        let growth_rate =
            (week_downloads - comparison_downloads) as f64 / comparison_downloads as f64;
        assert!((growth_rate - 0.5).abs() < f64::EPSILON);
    }
}
