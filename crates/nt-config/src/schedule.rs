//! Job schedule configuration (§6): cron expressions for the three
//! scheduler-hosted jobs.

use nt_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Once a day, per §4.F.
    pub publisher_cron: String,
    /// Early Monday UTC, per §4.I.
    pub trending_cron: String,
    pub tfm_cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            publisher_cron: "0 0 6 * * *".to_string(),
            trending_cron: "0 0 2 * * Mon".to_string(),
            tfm_cron: "0 30 2 * * Mon".to_string(),
        }
    }
}

impl ScheduleConfig {
    /// # Errors
    ///
    /// Returns an error if any configured cron expression fails to parse.
    pub fn validate(&self) -> Result<(), Error> {
        check(&self.publisher_cron, "schedule.publisher_cron")?;
        check(&self.trending_cron, "schedule.trending_cron")?;
        check(&self.tfm_cron, "schedule.tfm_cron")?;
        Ok(())
    }
}

fn check(expr: &str, field: &str) -> Result<(), Error> {
    cron::Schedule::from_str(expr)
        .map(|_| ())
        .map_err(|_| {
            ConfigError::InvalidCron {
                field: field.to_string(),
                expr: expr.to_string(),
            }
            .into()
        })
}
