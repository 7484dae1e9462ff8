//! Error types for sweep runs.

use pooltest_core::{ConfigError, PoolError};
use thiserror::Error;

/// Errors that can stop a sweep before or after it runs.
#[derive(Debug, Error)]
pub enum SimError {
    /// Bad sweep parameters
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pool assignment could not be built or loaded
    #[error("Pool design error: {0}")]
    Pool(#[from] PoolError),

    /// Export serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Export file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
