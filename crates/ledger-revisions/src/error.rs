//! Revision enumeration error types.

use thiserror::Error;

/// Errors that can occur while talking to the version-control system.
#[derive(Debug, Error)]
pub enum RevisionError {
    /// The git binary could not be executed at all
    #[error("Git CLI unavailable: {0}")]
    GitUnavailable(String),

    /// A git command exited non-zero
    #[error("Git command failed (`{command}`): {detail}")]
    CommandFailed { command: String, detail: String },

    /// A symbolic or abbreviated revision did not resolve to a commit id
    #[error("Cannot resolve revision '{0}'")]
    Unresolved(String),

    /// Git produced output the wrapper could not interpret
    #[error("Unexpected git output: {0}")]
    InvalidOutput(String),
}
