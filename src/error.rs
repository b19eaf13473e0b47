//! Error types for Sandwich Sentinel

use thiserror::Error;

use crate::source::SourceError;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Transaction source error
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
