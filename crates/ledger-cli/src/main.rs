//! Benchmark work ledger CLI.
//!
//! # Usage
//!
//! ```bash
//! bench-ledger determine --repo /src/server --config-file bench.json
//! bench-ledger mark --repo /src/server --status complete --config-file bench.json HEAD
//! bench-ledger query --architecture x86_64
//! bench-ledger cleanup
//! ```
//!
//! # Configuration
//!
//! Settings are loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Settings file (~/.config/bench-ledger/config.toml)
//! 3. Environment variables (BENCH_*)
//! 4. CLI flags

use anyhow::{Context, Result};
use clap::Parser;

use ledger_cli::{
    commands::init_tracing, handle_cleanup, handle_determine, handle_mark, handle_query, Cli,
    Commands,
};
use ledger_types::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    init_tracing(&settings.log_level)?;

    match cli.command {
        Commands::Determine {
            repo,
            branch,
            max_commits,
            architecture,
            config_file,
            disable_subset_detection,
        } => {
            handle_determine(
                &settings,
                repo,
                branch,
                max_commits,
                architecture,
                config_file,
                disable_subset_detection,
            )?;
        }
        Commands::Mark {
            repo,
            status,
            architecture,
            config_file,
            shas,
        } => {
            handle_mark(&settings, repo, &status, architecture, config_file, &shas)?;
        }
        Commands::Query {
            architecture,
            config_file,
            list_configs,
        } => {
            handle_query(&settings, architecture, config_file, list_configs)?;
        }
        Commands::Cleanup => {
            handle_cleanup(&settings)?;
        }
    }

    Ok(())
}
