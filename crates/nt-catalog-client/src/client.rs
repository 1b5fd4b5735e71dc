//! HTTP client used to fetch catalog documents.
//!
//! Deliberately has no retry logic: per §4.A the client surfaces typed
//! failures and the caller (the catalog processor) decides whether and how
//! to retry.

use nt_errors::{Error, NetworkError};
use reqwest::{Client, Response};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: format!("nugettrends/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Thin wrapper around a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client fails to build.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client })
    }

    /// # Errors
    ///
    /// Returns an error if the default configuration fails to build a client.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    /// # Errors
    ///
    /// Returns a typed `NetworkError` describing exactly why the request
    /// failed; never retries.
    pub async fn get(&self, url: &str) -> Result<Response, Error> {
        let response = self.client.get(url).send().await.map_err(classify)?;
        Ok(response)
    }
}

fn classify(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        NetworkError::Timeout {
            url: e.url().map(std::string::ToString::to_string).unwrap_or_default(),
        }
        .into()
    } else if e.is_connect() {
        NetworkError::ConnectionRefused(e.to_string()).into()
    } else {
        NetworkError::RequestFailed(e.to_string()).into()
    }
}
