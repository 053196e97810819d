//! Common API types and error definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::config::ConfigError;
use crate::validation::input::ValidationError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised by the adapters around the error model.
///
/// The model itself never fails; these cover input checks, configuration and
/// persisted output.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// Console output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Banner table with advisory warnings
    #[default]
    Text,
    /// Ordered key/value JSON object
    Json,
}
