#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Catalog Processor (component C).
//!
//! Walks the upstream catalog in commit order, using the cursor store (B)
//! to resume, and applies leaves to the metadata store (D) in bounded
//! concurrent windows. See §4.C for the algorithm this mirrors directly.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use nt_catalog_client::{fetch_catalog_index, fetch_catalog_leaf, fetch_catalog_page, NetClient};
use nt_errors::Error;
use nt_events::{AppEvent, CatalogEvent, EventEmitter, EventSender};
use nt_metadata_store::MetadataStore;
use nt_types::{LeafKind, PackageLeaf};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub catalog_index_url: String,
    pub min_commit_timestamp: Option<DateTime<Utc>>,
    pub max_commit_timestamp: Option<DateTime<Utc>>,
    pub exclude_redundant_leaves: bool,
    pub leaf_fetch_concurrency: usize,
}

pub struct CatalogProcessor {
    client: NetClient,
    store: MetadataStore,
    config: ProcessorConfig,
    tx: EventSender,
}

impl EventEmitter for CatalogProcessor {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl CatalogProcessor {
    #[must_use]
    pub fn new(client: NetClient, store: MetadataStore, config: ProcessorConfig, tx: EventSender) -> Self {
        Self {
            client,
            store,
            config,
            tx,
        }
    }

    /// Run one walk of the catalog: fetch the index, process every page
    /// whose commit window overlaps `(tmin, tmax]`, and advance the
    /// cursor after each page that is fully applied.
    ///
    /// # Errors
    ///
    /// Returns an error on the first unrecoverable failure; the cursor is
    /// never advanced past the last page applied successfully.
    pub async fn process(&self) -> Result<(), Error> {
        let t0 = self.store.cursor().get().await?;
        let tmin = match (t0, self.config.min_commit_timestamp) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };
        let tmax = self.config.max_commit_timestamp;

        self.emit(AppEvent::Catalog(CatalogEvent::WalkStarted {
            from_cursor: tmin.map(|t| t.to_rfc3339()),
        }));

        let index = fetch_catalog_index(&self.client, &self.config.catalog_index_url).await?;

        let mut pages: Vec<_> = index
            .items
            .into_iter()
            .filter(|p| tmin.is_none_or(|min| p.commit_timestamp > min) && tmax.is_none_or(|max| p.commit_timestamp <= max))
            .collect();
        pages.sort_by_key(|p| p.commit_timestamp);

        if pages.is_empty() {
            self.emit(AppEvent::Catalog(CatalogEvent::WalkCaughtUp));
            return Ok(());
        }

        for page in pages {
            let result = self.process_page(&page.id, tmin, tmax).await;
            match result {
                Ok(Some(advanced_to)) => {
                    self.store.cursor().set(advanced_to).await?;
                    self.emit(AppEvent::Catalog(CatalogEvent::CursorAdvanced {
                        commit_timestamp: advanced_to.to_rfc3339(),
                    }));
                }
                Ok(None) => {}
                Err(e) => {
                    self.emit(AppEvent::Catalog(CatalogEvent::WalkFailed {
                        error: e.to_string(),
                    }));
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Process one catalog page: fetch it, keep leaves in the commit
    /// window, optionally drop all-but-latest-per-key duplicates, fetch
    /// leaves in bounded concurrent windows, and apply them as one batch.
    /// Returns the highest commit timestamp successfully applied.
    async fn process_page(
        &self,
        page_url: &str,
        tmin: Option<DateTime<Utc>>,
        tmax: Option<DateTime<Utc>>,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        let page = fetch_catalog_page(&self.client, page_url).await?;

        let mut leaf_refs: Vec<_> = page
            .items
            .into_iter()
            .filter(|l| in_window(l.commit_timestamp, tmin, tmax))
            .collect();

        self.emit(AppEvent::Catalog(CatalogEvent::PageFetched {
            page_url: page_url.to_string(),
            leaf_count: leaf_refs.len(),
        }));

        if self.config.exclude_redundant_leaves {
            leaf_refs = latest_per_key(leaf_refs);
        }

        leaf_refs.sort_by_key(|l| l.commit_timestamp);

        if leaf_refs.is_empty() {
            return Ok(None);
        }

        let max_commit = leaf_refs.iter().map(|l| l.commit_timestamp).max();

        let concurrency = self.config.leaf_fetch_concurrency.max(1);
        let fetched: Vec<_> = stream::iter(leaf_refs.into_iter().map(|r| {
            let client = self.client.clone();
            async move {
                let doc = fetch_catalog_leaf(&client, &r.id).await;
                (r, doc)
            }
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;

        let mut details = Vec::new();
        let mut deletes = Vec::new();

        for (leaf_ref, doc) in fetched {
            match doc {
                Ok(doc) => match doc.leaf_kind()? {
                    LeafKind::PackageDetails => {
                        let leaf: PackageLeaf = doc.into_package_leaf().with_normalized_casing();
                        details.push(leaf);
                    }
                    LeafKind::PackageDelete => {
                        deletes.push(leaf_ref.package_id);
                    }
                },
                Err(e) => {
                    self.emit(AppEvent::Catalog(CatalogEvent::LeafFetchFailed {
                        leaf_url: leaf_ref.id,
                        error: e.to_string(),
                    }));
                    return Err(e);
                }
            }
        }

        let outcome = self.store.leaves().apply_batch(&details, &deletes).await?;
        self.emit(AppEvent::Catalog(CatalogEvent::LeavesApplied {
            applied: outcome.details_applied + outcome.deletes_applied,
            duplicates_detached: outcome.duplicates_detached,
        }));

        Ok(max_commit)
    }
}

fn in_window(t: DateTime<Utc>, tmin: Option<DateTime<Utc>>, tmax: Option<DateTime<Utc>>) -> bool {
    let above_min = tmin.is_none_or(|min| t > min);
    let below_max = tmax.is_none_or(|max| t <= max);
    above_min && below_max
}

/// Keep only the latest leaf reference per `(package_id, package_version)`
/// within one page (§4.C step 3).
fn latest_per_key(refs: Vec<nt_catalog_client::LeafRef>) -> Vec<nt_catalog_client::LeafRef> {
    let mut latest: HashMap<(String, String), nt_catalog_client::LeafRef> = HashMap::new();
    for r in refs {
        let key = (r.package_id.clone(), r.package_version.clone());
        match latest.get(&key) {
            Some(existing) if existing.commit_timestamp >= r.commit_timestamp => {}
            _ => {
                latest.insert(key, r);
            }
        }
    }
    latest.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_catalog_client::LeafRef;

    fn leaf_ref(id: &str, version: &str, ts: i64) -> LeafRef {
        LeafRef {
            id: format!("https://x/{id}-{version}-{ts}.json"),
            kind: vec!["nuget:catalog:PackageDetails".to_string()],
            commit_timestamp: DateTime::<Utc>::from_timestamp(ts, 0).unwrap(),
            package_id: id.to_string(),
            package_version: version.to_string(),
        }
    }

    #[test]
    fn latest_per_key_keeps_newest_commit() {
        let refs = vec![leaf_ref("Foo", "1.0.0", 100), leaf_ref("Foo", "1.0.0", 200)];
        let kept = latest_per_key(refs);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].commit_timestamp, DateTime::<Utc>::from_timestamp(200, 0).unwrap());
    }

    #[test]
    fn window_excludes_boundary_tmin_but_includes_tmax() {
        let tmin = Some(DateTime::<Utc>::from_timestamp(100, 0).unwrap());
        let tmax = Some(DateTime::<Utc>::from_timestamp(200, 0).unwrap());
        assert!(!in_window(DateTime::<Utc>::from_timestamp(100, 0).unwrap(), tmin, tmax));
        assert!(in_window(DateTime::<Utc>::from_timestamp(101, 0).unwrap(), tmin, tmax));
        assert!(in_window(DateTime::<Utc>::from_timestamp(200, 0).unwrap(), tmin, tmax));
        assert!(!in_window(DateTime::<Utc>::from_timestamp(201, 0).unwrap(), tmin, tmax));
    }
}
