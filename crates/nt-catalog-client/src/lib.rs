#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Catalog Client (component A).
//!
//! Fetches the upstream service index, the catalog index, catalog pages,
//! and individual catalog leaves as typed values. Every document is JSON
//! and parsing tolerates unknown and missing optional fields, since the
//! upstream catalog is not under our control. Network errors and
//! malformed JSON surface as typed failures; nothing here retries.

mod client;
mod documents;

pub use client::{NetClient, NetConfig};
pub use documents::{CatalogIndexDoc, CatalogLeafDoc, CatalogPageDoc, CatalogPageRef, LeafRef, ServiceIndexDoc};

use nt_errors::{CatalogError, Error, NetworkError};
use nt_types::LeafKind;

/// Fetch and parse the service index, which advertises the catalog's root
/// resource URL.
///
/// # Errors
///
/// Returns a network error on transport failure or a catalog error if the
/// body isn't valid JSON or lacks the resource the caller needs.
pub async fn fetch_service_index(client: &NetClient, url: &str) -> Result<ServiceIndexDoc, Error> {
    fetch_json(client, url).await
}

/// Fetch and parse the catalog index (the list of page references).
///
/// # Errors
///
/// See [`fetch_json`].
pub async fn fetch_catalog_index(client: &NetClient, url: &str) -> Result<CatalogIndexDoc, Error> {
    fetch_json(client, url).await
}

/// Fetch and parse a single catalog page (the list of leaf references).
///
/// # Errors
///
/// See [`fetch_json`].
pub async fn fetch_catalog_page(client: &NetClient, url: &str) -> Result<CatalogPageDoc, Error> {
    fetch_json(client, url).await
}

/// Fetch and parse a single catalog leaf document.
///
/// # Errors
///
/// See [`fetch_json`]. Also fails with [`CatalogError::UnknownLeafType`] if
/// the `@type` field names something other than `PackageDetails` or
/// `PackageDelete`.
pub async fn fetch_catalog_leaf(client: &NetClient, url: &str) -> Result<CatalogLeafDoc, Error> {
    let doc: CatalogLeafDoc = fetch_json(client, url).await?;
    let _ = doc.leaf_kind()?;
    Ok(doc)
}

impl CatalogLeafDoc {
    /// Classify this leaf's `@type` field into a [`LeafKind`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownLeafType`] for any type string other
    /// than the two the catalog defines.
    pub fn leaf_kind(&self) -> Result<LeafKind, Error> {
        if self.kind.iter().any(|t| t.ends_with("PackageDetails")) {
            Ok(LeafKind::PackageDetails)
        } else if self.kind.iter().any(|t| t.ends_with("PackageDelete")) {
            Ok(LeafKind::PackageDelete)
        } else {
            Err(CatalogError::UnknownLeafType {
                type_name: self.kind.join(","),
            }
            .into())
        }
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(client: &NetClient, url: &str) -> Result<T, Error> {
    let response = client.get(url).await?;

    if !response.status().is_success() {
        return Err(NetworkError::HttpError {
            status: response.status().as_u16(),
            message: response.status().to_string(),
        }
        .into());
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| NetworkError::RequestFailed(e.to_string()))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| {
            CatalogError::MalformedJson {
                message: format!("{url}: {e}"),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_kind_classifies_known_types() {
        let details = CatalogLeafDoc {
            kind: vec!["nuget:PackageDetails".to_string()],
            ..Default::default()
        };
        assert!(matches!(details.leaf_kind().unwrap(), LeafKind::PackageDetails));

        let delete = CatalogLeafDoc {
            kind: vec!["nuget:PackageDelete".to_string()],
            ..Default::default()
        };
        assert!(matches!(delete.leaf_kind().unwrap(), LeafKind::PackageDelete));
    }

    #[test]
    fn leaf_kind_rejects_unknown_types() {
        let doc = CatalogLeafDoc {
            kind: vec!["nuget:SomethingElse".to_string()],
            ..Default::default()
        };
        assert!(doc.leaf_kind().is_err());
    }
}
