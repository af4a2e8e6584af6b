//! CLI argument parsing for bench-ledger.
//!
//! Diagnostics go to stderr; stdout carries only machine-readable results
//! (the commit list from `determine`, rows from `query`, the count from
//! `cleanup`), so calling scripts can consume it directly.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Benchmark work ledger
///
/// Tracks which (commit, configuration, architecture) combinations have
/// been benchmarked and decides what still needs to run.
#[derive(Parser, Debug)]
#[command(name = "bench-ledger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to settings file (overrides default ~/.config/bench-ledger/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to the ledger database (overrides settings)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Ledger operations
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the commits that still need benchmarking, newest first
    Determine {
        /// Git repository of the benchmarked server
        #[arg(long)]
        repo: PathBuf,

        /// Branch to enumerate (default from settings)
        #[arg(short, long)]
        branch: Option<String>,

        /// Maximum number of commits to return
        #[arg(short, long, default_value = "3")]
        max_commits: i64,

        /// Architecture tag (defaults to the host architecture)
        #[arg(short, long)]
        architecture: Option<String>,

        /// Benchmark config file to check recorded coverage against
        #[arg(long)]
        config_file: Option<PathBuf>,

        /// Skip only exact configuration matches, never supersets
        #[arg(long)]
        disable_subset_detection: bool,
    },

    /// Record a status for one or more commits
    Mark {
        /// Git repository of the benchmarked server
        #[arg(long)]
        repo: PathBuf,

        /// Status to set (in_progress or complete)
        #[arg(short, long)]
        status: String,

        /// Architecture tag (defaults to the host architecture)
        #[arg(short, long)]
        architecture: Option<String>,

        /// Benchmark config file associated with these runs
        #[arg(long)]
        config_file: Option<PathBuf>,

        /// Commit ids to mark (the symbolic HEAD marker is accepted)
        #[arg(required = true)]
        shas: Vec<String>,
    },

    /// List recorded work items
    Query {
        /// Architecture tag (defaults to the host architecture)
        #[arg(short, long)]
        architecture: Option<String>,

        /// Restrict to rows recorded with exactly this config file
        #[arg(long)]
        config_file: Option<PathBuf>,

        /// List all distinct recorded configurations instead of rows
        #[arg(long)]
        list_configs: bool,
    },

    /// Remove abandoned in-progress entries
    Cleanup,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_determine_defaults() {
        let cli = Cli::parse_from(["bench-ledger", "determine", "--repo", "/src/server"]);
        match cli.command {
            Commands::Determine {
                repo,
                branch,
                max_commits,
                disable_subset_detection,
                ..
            } => {
                assert_eq!(repo, PathBuf::from("/src/server"));
                assert_eq!(branch, None);
                assert_eq!(max_commits, 3);
                assert!(!disable_subset_detection);
            }
            _ => panic!("Expected Determine command"),
        }
    }

    #[test]
    fn test_cli_determine_with_flags() {
        let cli = Cli::parse_from([
            "bench-ledger",
            "determine",
            "--repo",
            "/src/server",
            "-b",
            "unstable",
            "-m",
            "10",
            "-a",
            "aarch64",
            "--config-file",
            "bench.json",
            "--disable-subset-detection",
        ]);
        match cli.command {
            Commands::Determine {
                branch,
                max_commits,
                architecture,
                config_file,
                disable_subset_detection,
                ..
            } => {
                assert_eq!(branch, Some("unstable".to_string()));
                assert_eq!(max_commits, 10);
                assert_eq!(architecture, Some("aarch64".to_string()));
                assert_eq!(config_file, Some(PathBuf::from("bench.json")));
                assert!(disable_subset_detection);
            }
            _ => panic!("Expected Determine command"),
        }
    }

    #[test]
    fn test_cli_mark_requires_shas() {
        assert!(Cli::try_parse_from([
            "bench-ledger",
            "mark",
            "--repo",
            "/src/server",
            "--status",
            "complete"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_mark_with_shas() {
        let cli = Cli::parse_from([
            "bench-ledger",
            "mark",
            "--repo",
            "/src/server",
            "--status",
            "in_progress",
            "abc123",
            "HEAD",
        ]);
        match cli.command {
            Commands::Mark { status, shas, .. } => {
                assert_eq!(status, "in_progress");
                assert_eq!(shas, vec!["abc123", "HEAD"]);
            }
            _ => panic!("Expected Mark command"),
        }
    }

    #[test]
    fn test_cli_query_list_configs() {
        let cli = Cli::parse_from(["bench-ledger", "query", "--list-configs"]);
        match cli.command {
            Commands::Query { list_configs, .. } => assert!(list_configs),
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn test_cli_cleanup() {
        let cli = Cli::parse_from(["bench-ledger", "cleanup"]);
        assert!(matches!(cli.command, Commands::Cleanup));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "bench-ledger",
            "--db",
            "/var/lib/ledger.db",
            "--log-level",
            "debug",
            "cleanup",
        ]);
        assert_eq!(cli.db, Some("/var/lib/ledger.db".to_string()));
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }
}
