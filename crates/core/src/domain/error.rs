// Domain Error Types

use thiserror::Error;

/// Configuration resolution failures.
///
/// Never retried: the host gets the error back immediately and no partial
/// result is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("'{0}' parameter is missing")]
    MissingBlob(String),

    #[error("Malformed configuration: {0}")]
    Malformed(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid port '{0}': expected a number between 1 and 65535")]
    InvalidPort(String),

    #[error("Invalid timeout: timeout_secs must be greater than zero")]
    InvalidTimeout,

    #[error("Invalid host key policy '{0}': expected strict, fingerprint or insecure")]
    InvalidHostKeyPolicy(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
