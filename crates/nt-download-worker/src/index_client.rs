//! Client for the upstream package index: the "current totals" source
//! consulted once per package per day (§4.G step 2).

use nt_catalog_client::NetClient;
use nt_errors::{CatalogError, Error, NetworkError};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct PackageIndexEntry {
    pub download_count: i64,
    pub icon_url: Option<String>,
}

/// Abstracts the upstream lookup so the worker's batching and
/// availability-gate logic can be tested without a live network.
pub trait PackageIndexClient: Send + Sync {
    fn lookup(
        &self,
        package_id_lower: &str,
    ) -> impl std::future::Future<Output = Result<PackageIndexEntry, Error>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpPackageIndexClient {
    client: NetClient,
    url_template: String,
}

impl HttpPackageIndexClient {
    /// `url_template` must contain `{id}`, substituted with the lowercased
    /// package id.
    #[must_use]
    pub fn new(client: NetClient, url_template: String) -> Self {
        Self { client, url_template }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RegistrationSummary {
    #[serde(rename = "totalDownloads", default)]
    total_downloads: Option<i64>,
    #[serde(rename = "iconUrl", default)]
    icon_url: Option<String>,
}

impl PackageIndexClient for HttpPackageIndexClient {
    async fn lookup(&self, package_id_lower: &str) -> Result<PackageIndexEntry, Error> {
        let url = self.url_template.replace("{id}", package_id_lower);
        let response = self.client.get(&url).await?;

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

        let summary: RegistrationSummary = serde_json::from_slice(&bytes).map_err(|e| {
            CatalogError::MalformedJson {
                message: e.to_string(),
            }
        })?;

        Ok(PackageIndexEntry {
            download_count: summary.total_downloads.unwrap_or(0),
            icon_url: summary.icon_url,
        })
    }
}
