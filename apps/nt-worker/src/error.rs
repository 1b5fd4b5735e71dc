//! Worker error handling

use std::fmt;

/// Worker-specific error type: wraps domain errors with the setup and
/// I/O failures that only arise during process startup.
#[derive(Debug)]
pub enum CliError {
    Config(nt_errors::ConfigError),
    Domain(nt_errors::Error),
    Setup(String),
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "configuration error: {e}"),
            CliError::Domain(e) => write!(f, "{e}"),
            CliError::Setup(msg) => write!(f, "setup error: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Domain(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Setup(_) => None,
        }
    }
}

impl From<nt_errors::ConfigError> for CliError {
    fn from(e: nt_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<nt_errors::Error> for CliError {
    fn from(e: nt_errors::Error) -> Self {
        CliError::Domain(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
