//! Spiritbox replay: error types.

use spiritbox_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors of a replay.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A scenario, config or script file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A script or report could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The engine rejected an operation.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
