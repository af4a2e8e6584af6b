//! Revision enumeration for the bench-ledger system.
//!
//! A thin wrapper over the version-control system: lists candidate commit
//! ids for a branch (newest first), looks up commit timestamps, and
//! resolves the symbolic HEAD marker to a concrete id. The decision engine
//! consumes it through the [`RevisionSource`] trait so tests can substitute
//! an in-memory history.

pub mod error;
pub mod git;
pub mod source;

pub use error::RevisionError;
pub use git::{CommandRunner, GitCli, ProcessCommandRunner};
pub use source::{RevisionSource, SYMBOLIC_HEAD};
