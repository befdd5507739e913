// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::domain::ConfigError),

    #[error("Execution error: {0}")]
    Execution(#[from] crate::port::ExecutionError),
}

impl AppError {
    /// True when the check itself could not run (as opposed to bad input)
    pub fn is_execution(&self) -> bool {
        matches!(self, AppError::Execution(_))
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
