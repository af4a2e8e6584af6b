//! Command implementations for the bench-ledger CLI.
//!
//! Each handler loads what it needs, runs one engine operation, and prints
//! the machine-readable result to stdout. Everything else is tracing output
//! on stderr, so `determine`'s stdout can be captured by calling scripts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use ledger_engine::BenchLedger;
use ledger_revisions::GitCli;
use ledger_store::LedgerStore;
use ledger_types::{ConfigDocument, Settings, WorkStatus};

/// Initialize logging. The subscriber writes to stderr; stdout is reserved
/// for command results.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn load_config_document(path: Option<&Path>) -> Result<Option<ConfigDocument>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let document = ConfigDocument::from_json_str(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            Ok(Some(document))
        }
        None => Ok(None),
    }
}

fn open_ledger(settings: &Settings, repo: PathBuf) -> Result<BenchLedger<GitCli>> {
    let db_path = PathBuf::from(&settings.db_path);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("Failed to create ledger directory")?;
        }
    }
    let store = LedgerStore::open(&db_path)?;
    Ok(BenchLedger::new(store, GitCli::new(repo)))
}

/// Print the commits that still need benchmarking, space-delimited on one
/// line. An empty line means nothing is left and is a success.
#[allow(clippy::too_many_arguments)]
pub fn handle_determine(
    settings: &Settings,
    repo: PathBuf,
    branch: Option<String>,
    max_commits: i64,
    architecture: Option<String>,
    config_file: Option<PathBuf>,
    disable_subset_detection: bool,
) -> Result<()> {
    let branch = branch.unwrap_or_else(|| settings.branch.clone());
    let architecture = architecture.unwrap_or_else(|| settings.architecture.clone());
    let config = load_config_document(config_file.as_deref())?;

    let ledger = open_ledger(settings, repo)?;
    let commits = ledger.determine_commits_to_benchmark(
        &branch,
        max_commits,
        &architecture,
        config.as_ref(),
        !disable_subset_detection,
    )?;

    info!(
        count = commits.len(),
        branch = %branch,
        architecture = %architecture,
        "Commits needing benchmarks"
    );
    println!("{}", commits.join(" "));
    Ok(())
}

/// Record a status for each given commit (HEAD is resolved first).
pub fn handle_mark(
    settings: &Settings,
    repo: PathBuf,
    status: &str,
    architecture: Option<String>,
    config_file: Option<PathBuf>,
    shas: &[String],
) -> Result<()> {
    let status: WorkStatus = status.parse()?;
    let architecture = architecture.unwrap_or_else(|| settings.architecture.clone());
    let config = load_config_document(config_file.as_deref())?;

    let ledger = open_ledger(settings, repo)?;
    ledger.mark_commits(shas, status, &architecture, config.as_ref())?;
    Ok(())
}

/// List recorded work items, or the distinct recorded configurations.
pub fn handle_query(
    settings: &Settings,
    architecture: Option<String>,
    config_file: Option<PathBuf>,
    list_configs: bool,
) -> Result<()> {
    // The revision source is not consulted by read-only operations.
    let ledger = open_ledger(settings, PathBuf::from("."))?;

    if list_configs {
        let configs = ledger.distinct_configs()?;
        info!(count = configs.len(), "Distinct recorded configurations");
        for config in configs {
            println!("{}", config.canonical_json());
        }
        return Ok(());
    }

    let architecture = architecture.unwrap_or_else(|| settings.architecture.clone());
    let config = load_config_document(config_file.as_deref())?;
    let items = ledger.query(&architecture, config.as_ref())?;

    match &config {
        Some(config) => info!(
            architecture = %architecture,
            config = %config.summary(),
            count = items.len(),
            "Recorded work items for configuration"
        ),
        None => info!(
            architecture = %architecture,
            count = items.len(),
            "Recorded work items"
        ),
    }

    for item in items {
        println!(
            "{}\t{}\t{}\t{}",
            item.sha,
            item.status,
            item.timestamp.to_rfc3339(),
            item.architecture
        );
    }
    Ok(())
}

/// Remove abandoned in-progress entries and print how many were removed.
pub fn handle_cleanup(settings: &Settings) -> Result<()> {
    let ledger = open_ledger(settings, PathBuf::from("."))?;
    let removed = ledger.cleanup_incomplete()?;
    println!("{removed}");
    Ok(())
}
