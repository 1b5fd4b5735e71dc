#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for the `NuGet Trends` ingestion core
//!
//! Mirrors §6's enumerated configuration surface. Load order, lowest to
//! highest precedence:
//! - compiled defaults
//! - an optional TOML file
//! - environment variables (prefix `NUGETTRENDS_`)
//! - process-specific CLI flags, applied by each binary after `load`

mod availability;
mod bus;
mod catalog;
mod downloads;
mod logging;
mod schedule;
mod stores;

pub use availability::AvailabilityConfig;
pub use bus::BusConfig;
pub use catalog::CatalogConfig;
pub use downloads::DownloadsConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use schedule::ScheduleConfig;
pub use stores::{MetadataStoreConfig, TimeseriesStoreConfig};

use nt_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure, shared by `nt-scheduler` and `nt-worker`.
/// Each binary only reads the sections relevant to the components it
/// hosts, but both parse the same file so a single config can describe
/// the whole deployment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub downloads: DownloadsConfig,

    #[serde(default)]
    pub availability: AvailabilityConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub bus: BusConfig,

    #[serde(default)]
    pub metadata: MetadataStoreConfig,

    #[serde(default)]
    pub timeseries: TimeseriesStoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from an optional file path, falling back to compiled
    /// defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if a provided path cannot be read, its contents
    /// fail to parse as TOML, or an environment override/the resulting
    /// config fails validation.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        let mut config = match path {
            Some(p) => Self::load_from_file(p).await?,
            None => Self::default(),
        };
        config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::NotFound {
                path: format!("{}: {e}", path.display()),
            })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError { message: e.to_string() }.into())
    }

    /// Merge environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed
    /// into the expected type.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(v) = std::env::var("NUGETTRENDS_CATALOG_SERVICE_INDEX_URL") {
            self.catalog.service_index_url = v;
        }
        if let Ok(v) = std::env::var("NUGETTRENDS_DOWNLOADS_WORKER_COUNT") {
            self.downloads.worker_count = parse_env("NUGETTRENDS_DOWNLOADS_WORKER_COUNT", &v)?;
        }
        if let Ok(v) = std::env::var("NUGETTRENDS_DOWNLOADS_BATCH_SIZE") {
            self.downloads.batch_size = parse_env("NUGETTRENDS_DOWNLOADS_BATCH_SIZE", &v)?;
        }
        if let Ok(v) = std::env::var("NUGETTRENDS_AVAILABILITY_COOLDOWN_SECS") {
            self.availability.cooldown_secs =
                parse_env("NUGETTRENDS_AVAILABILITY_COOLDOWN_SECS", &v)?;
        }
        if let Ok(v) = std::env::var("NUGETTRENDS_BUS_URL") {
            self.bus.url = v;
        }
        if let Ok(v) = std::env::var("NUGETTRENDS_METADATA_CONNECTION") {
            self.metadata.connection = v;
        }
        if let Ok(v) = std::env::var("NUGETTRENDS_TIMESERIES_CONNECTION") {
            self.timeseries.connection = v;
        }
        if let Ok(v) = std::env::var("NUGETTRENDS_LOG_FORMAT") {
            self.logging.format = match v.as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "NUGETTRENDS_LOG_FORMAT".to_string(),
                        value: v,
                    }
                    .into())
                }
            };
        }
        if let Ok(v) = std::env::var("RUST_LOG") {
            self.logging.filter = v;
        }
        Ok(())
    }

    /// Validate cron expressions and cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if a cron expression is not a valid 5-field
    /// expression, or a configured batch/worker count is zero.
    pub fn validate(&self) -> Result<(), Error> {
        self.schedule.validate()?;
        if self.downloads.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "downloads.batch_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.downloads.worker_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "downloads.worker_count".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, Error> {
    value.parse().map_err(|_| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut config = Config::default();
        config.downloads.batch_size = 0;
        assert!(config.validate().is_err());
    }
}
