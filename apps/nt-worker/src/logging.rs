//! `tracing-subscriber` initialization.
//!
//! Event-to-log dispatch itself lives in `nt_events::run_subscriber`; this
//! module only wires up the process-wide subscriber that those `tracing`
//! calls write through.

use nt_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init(config: &LoggingConfig, force_json: bool) {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let format = if force_json { LogFormat::Json } else { config.format };

    match format {
        LogFormat::Json => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        LogFormat::Pretty => {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }
}
