//! Work items: one ledger row per (commit, configuration, architecture).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::document::ConfigDocument;
use crate::error::LedgerError;

/// Status of one benchmarking attempt.
///
/// `InProgress` is transient: every decision cycle sweeps all `InProgress`
/// rows store-wide before enumerating candidates, so an abandoned claim
/// never outlives the next cycle. `Complete` rows are permanent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// A runner has claimed this combination and may still be working on it
    InProgress,
    /// The benchmark run finished and results were recorded
    Complete,
}

impl WorkStatus {
    /// Stable string form used in storage and on the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::InProgress => "in_progress",
            WorkStatus::Complete => "complete",
        }
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(WorkStatus::InProgress),
            "complete" => Ok(WorkStatus::Complete),
            other => Err(LedgerError::InvalidInput(format!(
                "status must be 'in_progress' or 'complete', got '{other}'"
            ))),
        }
    }
}

/// Input to the ledger's upsert path.
///
/// `sha` must already be a concrete commit id; symbolic references are
/// resolved by the caller before a row is built. Bookkeeping timestamps are
/// store-managed and absent here.
#[derive(Debug, Clone)]
pub struct NewWorkItem {
    /// Full hex commit id
    pub sha: String,
    /// Commit authoring time (not the wall clock of the benchmark run)
    pub timestamp: DateTime<Utc>,
    pub status: WorkStatus,
    pub config: ConfigDocument,
    pub architecture: String,
}

/// One ledger row as read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub sha: String,
    /// Commit authoring time
    pub timestamp: DateTime<Utc>,
    pub status: WorkStatus,
    pub config: ConfigDocument,
    pub architecture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_roundtrip() {
        for status in [WorkStatus::InProgress, WorkStatus::Complete] {
            let parsed: WorkStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert!("done".parse::<WorkStatus>().is_err());
        assert!("".parse::<WorkStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&WorkStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);
    }

    #[test]
    fn test_work_item_serialization() {
        let item = WorkItem {
            sha: "a".repeat(40),
            timestamp: Utc::now(),
            status: WorkStatus::Complete,
            config: ConfigDocument::from_json_str(r#"{"clients": [1]}"#).unwrap(),
            architecture: "x86_64".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let text = serde_json::to_string(&item).unwrap();
        let decoded: WorkItem = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded.sha, item.sha);
        assert_eq!(decoded.status, item.status);
        assert_eq!(decoded.config, item.config);
    }
}
