//! Error types shared across the bench-ledger system.

use thiserror::Error;

/// Unified error type for input validation and configuration loading.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Caller supplied an invalid value
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
