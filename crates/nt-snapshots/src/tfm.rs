//! TFM adoption refresher (§4.I): monthly recompute of
//! `TfmAdoptionSnapshot` from the full catalog-leaf corpus.

use crate::{run_locked_job, JobOutcome, TFM_JOB_NAME};
use chrono::{NaiveDate, Utc};
use nt_errors::Error;
use nt_events::{EventEmitter, EventSender};
use nt_metadata_store::MetadataStore;
use nt_timeseries_store::TimeseriesStore;
use nt_types::{tfm_family, TfmAdoptionSnapshotRow};
use std::collections::BTreeMap;

pub struct TfmRefresher {
    metadata: MetadataStore,
    timeseries: TimeseriesStore,
    tx: EventSender,
}

impl EventEmitter for TfmRefresher {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl TfmRefresher {
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
    /// Returns an error if any query or write fails.
    pub async fn run(&self) -> Result<JobOutcome, Error> {
        let metadata = self.metadata.clone();
        let timeseries = self.timeseries.clone();
        run_locked_job(&self.metadata, TFM_JOB_NAME, &self.tx, || async move {
            compute_and_write(&metadata, &timeseries).await
        })
        .await
    }
}

async fn compute_and_write(metadata: &MetadataStore, timeseries: &TimeseriesStore) -> Result<usize, Error> {
    let listings = metadata.leaves().monthly_tfm_first_listings().await?;

    // new_package_count per (month, tfm).
    let mut new_counts: BTreeMap<(NaiveDate, String), u32> = BTreeMap::new();
    for listing in listings {
        *new_counts.entry((listing.month, listing.tfm)).or_insert(0) += 1;
    }

    // All tfms observed, each with a running cumulative total carried
    // across every month in ascending order.
    let mut cumulative: BTreeMap<String, u32> = BTreeMap::new();
    let computed_at = Utc::now();
    let mut rows = Vec::with_capacity(new_counts.len());

    for ((month, tfm), new_package_count) in new_counts {
        let entry = cumulative.entry(tfm.clone()).or_insert(0);
        *entry += new_package_count;

        rows.push(TfmAdoptionSnapshotRow {
            month,
            family: tfm_family(&tfm),
            tfm,
            new_package_count,
            cumulative_package_count: *entry,
            computed_at,
        });
    }

    let rows_written = rows.len();
    timeseries.write_tfm_snapshot(&rows).await?;
    Ok(rows_written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_counts_accumulate_across_months_per_tfm() {
        let mut new_counts: BTreeMap<(NaiveDate, String), u32> = BTreeMap::new();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        new_counts.insert((jan, "net8.0".to_string()), 5);
        new_counts.insert((feb, "net8.0".to_string()), 3);

        let mut cumulative: BTreeMap<String, u32> = BTreeMap::new();
        let mut totals = Vec::new();
        for ((_month, tfm), count) in new_counts {
            let entry = cumulative.entry(tfm).or_insert(0);
            *entry += count;
            totals.push(*entry);
        }
        assert_eq!(totals, vec![5, 8]);
    }
}
