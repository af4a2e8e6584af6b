//! CLI for the bench-ledger work deduplication and completion ledger.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{handle_cleanup, handle_determine, handle_mark, handle_query};
