//! Error types for loading, storing and exporting training cost data.
//!
//! The cost model itself never fails; everything here belongs to the
//! surrounding I/O and repository layers.

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid {kind}: {reason}")]
    Validation { kind: &'static str, reason: String },

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },
}

impl CotError {
    pub fn validation(kind: &'static str, reason: impl Into<String>) -> Self {
        CotError::Validation {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type alias for crate operations.
pub type CotResult<T> = Result<T, CotError>;
