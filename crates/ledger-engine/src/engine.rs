//! The decision engine: which commits still need benchmarking, and the
//! idempotent write path runners use to claim and complete work.

use std::collections::HashSet;

use serde_json::Map;
use tracing::{debug, info};

use ledger_match::is_covered_by;
use ledger_revisions::{RevisionSource, SYMBOLIC_HEAD};
use ledger_store::LedgerStore;
use ledger_types::{ConfigDocument, NewWorkItem, WorkItem, WorkStatus};

use crate::error::EngineError;

/// Service layer over the ledger store and a revision source.
///
/// Called synchronously by independent runner processes against a shared
/// store. There is no distributed lock between a `determine` call and the
/// `mark(InProgress)` a runner performs to claim a commit: two runners
/// invoking `determine` concurrently with the same inputs can be handed the
/// same commit id. Deployments either serialize `determine` calls or treat
/// the claim as best-effort and re-check completed configs before starting
/// expensive work. An abandoned InProgress row survives exactly until the
/// next decision cycle sweeps it; there is no wall-clock lease.
pub struct BenchLedger<R: RevisionSource> {
    store: LedgerStore,
    revisions: R,
}

impl<R: RevisionSource> BenchLedger<R> {
    pub fn new(store: LedgerStore, revisions: R) -> Self {
        Self { store, revisions }
    }

    /// Return up to `max_commits` commit ids from `branch` that still need
    /// benchmarking with the given configuration on `architecture`.
    ///
    /// Clears abandoned InProgress rows first, then walks the candidate
    /// list newest-first, skipping commits whose requested workload is
    /// already recorded Complete, either as an exact match or (when
    /// `subset_detection` is on and a configuration was given) as a subset
    /// of one covering recorded configuration. No union across recorded
    /// rows is computed: a single covering row must exist.
    ///
    /// An empty result is the normal "nothing left to benchmark" outcome.
    pub fn determine_commits_to_benchmark(
        &self,
        branch: &str,
        max_commits: i64,
        architecture: &str,
        config: Option<&ConfigDocument>,
        subset_detection: bool,
    ) -> Result<Vec<String>, EngineError> {
        if max_commits < 0 {
            return Err(EngineError::InvalidInput(format!(
                "max_commits must be non-negative, got {max_commits}"
            )));
        }
        if max_commits == 0 {
            return Ok(Vec::new());
        }

        let removed = self.store.delete_where_status(WorkStatus::InProgress)?;
        info!(removed, "Cleared in-progress work items before deciding");

        let candidates = self.revisions.list_commits(branch)?;
        debug!(branch, candidates = candidates.len(), "Enumerated candidate commits");

        // Without a requested configuration there is nothing to compare
        // against, so any Complete row excludes its commit and the subset
        // search never runs.
        let exact_complete: HashSet<String> = self.store.complete_shas(architecture, config)?;

        let mut commits = Vec::new();
        let mut subset_skipped = 0usize;

        for sha in candidates {
            if exact_complete.contains(&sha) {
                continue;
            }

            if subset_detection {
                if let Some(requested) = config {
                    let recorded = self.store.find_complete_for_commit(&sha, architecture)?;
                    if let Some(covering) = recorded.iter().find(|c| is_covered_by(requested, c)) {
                        subset_skipped += 1;
                        let short = &sha[..sha.len().min(8)];
                        info!(
                            sha = %short,
                            covering = %covering.summary(),
                            "Skipping commit: requested workload covered by recorded configuration"
                        );
                        continue;
                    }
                }
            }

            commits.push(sha);
            if commits.len() as i64 >= max_commits {
                break;
            }
        }

        if subset_skipped > 0 {
            info!(
                count = subset_skipped,
                "Subset detection skipped commits with covering configurations"
            );
        }

        Ok(commits)
    }

    /// Mark each commit with `status` for the given configuration and
    /// architecture.
    ///
    /// The symbolic HEAD marker is resolved to a concrete id and each
    /// commit's timestamp is looked up before the row is written. Safe to
    /// call repeatedly and from multiple processes: each write is one
    /// conditional upsert, so repeated marks only advance `updated_at`.
    pub fn mark_commits(
        &self,
        shas: &[String],
        status: WorkStatus,
        architecture: &str,
        config: Option<&ConfigDocument>,
    ) -> Result<(), EngineError> {
        for requested in shas {
            if requested.is_empty() {
                return Err(EngineError::InvalidInput(
                    "commit id must not be empty".to_string(),
                ));
            }

            let sha = if requested == SYMBOLIC_HEAD {
                self.revisions.resolve_head()?
            } else {
                requested.clone()
            };
            let timestamp = self.revisions.commit_timestamp(&sha)?;

            // Rows marked without a configuration store the empty document,
            // so the unique key stays well-defined.
            let config = config
                .cloned()
                .unwrap_or_else(|| ConfigDocument::Object(Map::new()));

            info!(
                sha = %sha,
                architecture,
                status = %status,
                timestamp = %timestamp,
                "Marking commit"
            );

            self.store.upsert(&NewWorkItem {
                sha,
                timestamp,
                status,
                config,
                architecture: architecture.to_string(),
            })?;
        }
        Ok(())
    }

    /// Remove every InProgress row, store-wide. Returns the number removed.
    ///
    /// Runs automatically at the start of each decision cycle; exposed for
    /// operator-triggered resets as well.
    pub fn cleanup_incomplete(&self) -> Result<usize, EngineError> {
        let removed = self.store.delete_where_status(WorkStatus::InProgress)?;
        if removed > 0 {
            info!(removed, "Cleaned up incomplete work items");
        }
        Ok(removed)
    }

    /// Ledger rows for an architecture, optionally restricted to an exact
    /// configuration match, newest commit first.
    pub fn query(
        &self,
        architecture: &str,
        config: Option<&ConfigDocument>,
    ) -> Result<Vec<WorkItem>, EngineError> {
        Ok(self.store.find_items(architecture, config)?)
    }

    /// Every distinct configuration recorded in the ledger.
    pub fn distinct_configs(&self) -> Result<Vec<ConfigDocument>, EngineError> {
        Ok(self.store.distinct_configs()?)
    }
}
