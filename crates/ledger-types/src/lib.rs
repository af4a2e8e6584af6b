//! Shared domain types for the bench-ledger system.
//!
//! This crate defines the core data structures used throughout the system:
//! - Configuration documents: the JSON parameter matrix of one benchmark run
//! - Work items: one ledger row per (commit, configuration, architecture)
//! - Settings: layered configuration for the CLI

pub mod config;
pub mod document;
pub mod error;
pub mod item;

pub use config::Settings;
pub use document::ConfigDocument;
pub use error::LedgerError;
pub use item::{NewWorkItem, WorkItem, WorkStatus};
