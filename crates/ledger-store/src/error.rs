//! Ledger store error types.

use thiserror::Error;

/// Errors that can occur in the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store unreachable (database file could not be opened)
    #[error("Ledger connection error: {0}")]
    Connection(String),

    /// Table or index creation failed
    #[error("Ledger schema error: {0}")]
    Schema(String),

    /// A stored row violates an expected invariant (e.g. its config column
    /// is not a valid configuration document)
    #[error("Ledger data integrity error: {0}")]
    DataIntegrity(String),

    /// SQLite operation failed
    #[error("Ledger query error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
