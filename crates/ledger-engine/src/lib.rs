//! Work decision engine and status mutator for the bench-ledger system.
//!
//! Combines the ledger store, the subset matcher, and a revision source to
//! answer "which commits still need benchmarking" and to record claims and
//! completions. Stateless between calls: every operation re-queries the
//! store, and nothing here runs in the background.

pub mod engine;
pub mod error;

pub use engine::BenchLedger;
pub use error::EngineError;
