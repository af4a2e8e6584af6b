//! Schema for the `benchmark_commits` table.
//!
//! One row per (sha, config, architecture). The `config` column holds the
//! canonical JSON form of the configuration document, so TEXT equality on
//! the column matches structural equality of the document. Bookkeeping
//! timestamps are store-managed.

/// Idempotent DDL: safe to execute on every open.
pub const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS benchmark_commits (
        id INTEGER PRIMARY KEY,
        sha TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('in_progress', 'complete')),
        config TEXT NOT NULL,
        architecture TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),

        UNIQUE(sha, config, architecture)
    );

    CREATE INDEX IF NOT EXISTS idx_commits_sha ON benchmark_commits(sha);
    CREATE INDEX IF NOT EXISTS idx_commits_status ON benchmark_commits(status);
    CREATE INDEX IF NOT EXISTS idx_commits_timestamp ON benchmark_commits(timestamp);
    CREATE INDEX IF NOT EXISTS idx_commits_architecture ON benchmark_commits(architecture);
    CREATE INDEX IF NOT EXISTS idx_commits_config ON benchmark_commits(config);
    CREATE INDEX IF NOT EXISTS idx_commits_sha_status ON benchmark_commits(sha, status);
";
