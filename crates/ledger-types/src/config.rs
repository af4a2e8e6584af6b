//! Settings loading for bench-ledger.
//!
//! Layered precedence: built-in defaults, then the config file
//! (~/.config/bench-ledger/config.toml), then BENCH_* environment
//! variables. CLI flags are applied by the caller on top of the result.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::LedgerError;

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the SQLite ledger database
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Branch whose history is enumerated for candidate commits
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Architecture tag for this host's ledger rows
    #[serde(default = "default_architecture")]
    pub architecture: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_db_path() -> String {
    ProjectDirs::from("", "", "bench-ledger")
        .map(|p| p.data_local_dir().join("ledger.db"))
        .unwrap_or_else(|| PathBuf::from("./ledger.db"))
        .to_string_lossy()
        .to_string()
}

fn default_branch() -> String {
    "unstable".to_string()
}

fn default_architecture() -> String {
    std::env::consts::ARCH.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            branch: default_branch(),
            architecture: default_architecture(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/bench-ledger/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (BENCH_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, LedgerError> {
        let config_dir = ProjectDirs::from("", "", "bench-ledger")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("db_path", default_db_path())
            .map_err(|e| LedgerError::Config(e.to_string()))?
            .set_default("branch", default_branch())
            .map_err(|e| LedgerError::Config(e.to_string()))?
            .set_default("architecture", default_architecture())
            .map_err(|e| LedgerError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| LedgerError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: BENCH_DB_PATH, BENCH_BRANCH, BENCH_ARCHITECTURE, ...
        builder = builder.add_source(
            Environment::with_prefix("BENCH")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| LedgerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| LedgerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.branch, "unstable");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.architecture, std::env::consts::ARCH);
    }

    #[test]
    fn test_load_with_defaults() {
        let settings = Settings::load(None).unwrap();
        assert!(!settings.db_path.is_empty());
        assert_eq!(settings.branch, "unstable");
    }
}
