//! The revision source trait consumed by the decision engine.

use chrono::{DateTime, Utc};

use crate::error::RevisionError;

/// Symbolic marker for the current checkout; resolved to a concrete commit
/// id before anything is stored.
pub const SYMBOLIC_HEAD: &str = "HEAD";

/// Supplier of candidate revisions and their metadata.
pub trait RevisionSource {
    /// Commit ids reachable from `branch`, newest first. Order is
    /// preserved by all consumers.
    fn list_commits(&self, branch: &str) -> Result<Vec<String>, RevisionError>;

    /// The commit timestamp of `sha`.
    fn commit_timestamp(&self, sha: &str) -> Result<DateTime<Utc>, RevisionError>;

    /// Resolve the symbolic HEAD marker to a concrete commit id.
    fn resolve_head(&self) -> Result<String, RevisionError>;
}
