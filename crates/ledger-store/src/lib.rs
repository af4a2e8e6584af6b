//! Durable storage for the benchmark work ledger.
//!
//! Provides a SQLite-backed table of work items keyed by
//! (sha, config, architecture) with:
//! - Idempotent schema bootstrap
//! - Atomic single-statement upsert (insert-or-update on key conflict)
//! - Bulk delete by status for crash recovery
//! - Exact-match and per-commit queries used by the decision engine

pub mod error;
pub mod schema;
pub mod store;

pub use error::StoreError;
pub use store::LedgerStore;
