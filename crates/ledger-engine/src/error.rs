//! Decision engine error types.

use thiserror::Error;

use ledger_revisions::RevisionError;
use ledger_store::StoreError;

/// Errors surfaced by the decision engine and status mutator.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller supplied an invalid value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The ledger store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The version-control wrapper failed
    #[error(transparent)]
    Revision(#[from] RevisionError),
}
