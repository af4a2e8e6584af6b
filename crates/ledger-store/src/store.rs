//! SQLite-backed ledger store.
//!
//! All mutation goes through [`LedgerStore::upsert`], a single conditional
//! statement keyed by (sha, config, architecture). Concurrent runners may
//! share one database file; SQLite's write serialization plus the
//! one-statement upsert keeps the table free of duplicate rows and lost
//! updates without any application-level read-then-write.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use tracing::{debug, info};

use ledger_types::{ConfigDocument, NewWorkItem, WorkItem, WorkStatus};

use crate::error::StoreError;
use crate::schema::SCHEMA_SQL;

/// Durable table of benchmark work items.
pub struct LedgerStore {
    conn: Connection,
}

/// Row fields as read from SQLite, before parsing.
struct RawRow {
    sha: String,
    timestamp: String,
    status: String,
    config: String,
    architecture: String,
    created_at: String,
    updated_at: String,
}

impl LedgerStore {
    /// Open (creating if necessary) the ledger database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!("Opening ledger store at {:?}", path);
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Connection(format!("{}: {e}", path.display())))?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open a private in-memory ledger, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Connection(e.to_string()))?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Idempotently create the ledger table and its indexes.
    ///
    /// Invoked by `open`; safe to call again at any time.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(|e| StoreError::Schema(e.to_string()))
    }

    /// Insert a work item, or update `status`/`updated_at` if the
    /// (sha, config, architecture) row already exists.
    ///
    /// This is one conditional statement, not a read-then-write, so two
    /// concurrent callers marking the same triple can never produce
    /// duplicate rows or lose an update.
    pub fn upsert(&self, item: &NewWorkItem) -> Result<(), StoreError> {
        self.conn.execute(
            "
            INSERT INTO benchmark_commits (sha, timestamp, status, config, architecture)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(sha, config, architecture) DO UPDATE SET
                status = excluded.status,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            ",
            params![
                item.sha,
                item.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                item.status.as_str(),
                item.config.canonical_json(),
                item.architecture,
            ],
        )?;
        debug!(sha = %item.sha, status = %item.status, architecture = %item.architecture,
               "Upserted work item");
        Ok(())
    }

    /// Delete every row with the given status, store-wide. Returns the
    /// number of rows removed.
    pub fn delete_where_status(&self, status: WorkStatus) -> Result<usize, StoreError> {
        let count = self.conn.execute(
            "DELETE FROM benchmark_commits WHERE status = ?1",
            params![status.as_str()],
        )?;
        Ok(count)
    }

    /// Distinct commit ids recorded Complete for an architecture, optionally
    /// restricted to an exact configuration match.
    pub fn complete_shas(
        &self,
        architecture: &str,
        config: Option<&ConfigDocument>,
    ) -> Result<HashSet<String>, StoreError> {
        let mut shas = HashSet::new();
        match config {
            Some(config) => {
                let mut stmt = self.conn.prepare(
                    "
                    SELECT DISTINCT sha FROM benchmark_commits
                    WHERE status = 'complete' AND config = ?1 AND architecture = ?2
                    ",
                )?;
                let rows =
                    stmt.query_map(params![config.canonical_json(), architecture], |row| {
                        row.get::<_, String>(0)
                    })?;
                for sha in rows {
                    shas.insert(sha?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "
                    SELECT DISTINCT sha FROM benchmark_commits
                    WHERE status = 'complete' AND architecture = ?1
                    ",
                )?;
                let rows = stmt.query_map(params![architecture], |row| row.get::<_, String>(0))?;
                for sha in rows {
                    shas.insert(sha?);
                }
            }
        }
        Ok(shas)
    }

    /// Complete rows for an architecture, optionally restricted to an exact
    /// configuration match.
    pub fn find_complete(
        &self,
        architecture: &str,
        config: Option<&ConfigDocument>,
    ) -> Result<Vec<WorkItem>, StoreError> {
        self.select_items("status = 'complete'", architecture, config)
    }

    /// Rows of any status for an architecture, newest commit first.
    /// Backs the CLI `query` operation.
    pub fn find_items(
        &self,
        architecture: &str,
        config: Option<&ConfigDocument>,
    ) -> Result<Vec<WorkItem>, StoreError> {
        self.select_items("1 = 1", architecture, config)
    }

    /// All configurations recorded Complete for one commit/architecture
    /// pair. Used by the subset search in the decision engine.
    pub fn find_complete_for_commit(
        &self,
        sha: &str,
        architecture: &str,
    ) -> Result<Vec<ConfigDocument>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT config FROM benchmark_commits
            WHERE sha = ?1 AND status = 'complete' AND architecture = ?2
            ",
        )?;
        let rows = stmt.query_map(params![sha, architecture], |row| row.get::<_, String>(0))?;

        let mut configs = Vec::new();
        for text in rows {
            configs.push(parse_stored_config(&text?)?);
        }
        Ok(configs)
    }

    /// Every distinct configuration document recorded in the ledger.
    pub fn distinct_configs(&self) -> Result<Vec<ConfigDocument>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT config FROM benchmark_commits")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut configs = Vec::new();
        for text in rows {
            configs.push(parse_stored_config(&text?)?);
        }
        Ok(configs)
    }

    fn select_items(
        &self,
        status_clause: &str,
        architecture: &str,
        config: Option<&ConfigDocument>,
    ) -> Result<Vec<WorkItem>, StoreError> {
        let columns = "sha, timestamp, status, config, architecture, created_at, updated_at";
        let raw_rows = match config {
            Some(config) => {
                let sql = format!(
                    "
                    SELECT {columns} FROM benchmark_commits
                    WHERE {status_clause} AND config = ?1 AND architecture = ?2
                    ORDER BY timestamp DESC
                    "
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(
                    params![config.canonical_json(), architecture],
                    Self::map_raw_row,
                )?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!(
                    "
                    SELECT {columns} FROM benchmark_commits
                    WHERE {status_clause} AND architecture = ?1
                    ORDER BY timestamp DESC
                    "
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![architecture], Self::map_raw_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        raw_rows.into_iter().map(parse_row).collect()
    }

    fn map_raw_row(row: &rusqlite::Row<'_>) -> Result<RawRow, rusqlite::Error> {
        Ok(RawRow {
            sha: row.get(0)?,
            timestamp: row.get(1)?,
            status: row.get(2)?,
            config: row.get(3)?,
            architecture: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    #[cfg(test)]
    pub(crate) fn raw_connection(&self) -> &Connection {
        &self.conn
    }
}

/// Parse a stored config column; failure is a data-integrity error, never
/// silently skipped (a skipped row could hide double-booked work).
fn parse_stored_config(text: &str) -> Result<ConfigDocument, StoreError> {
    ConfigDocument::from_json_str(text)
        .map_err(|e| StoreError::DataIntegrity(format!("stored config {text:?}: {e}")))
}

fn parse_timestamp(column: &str, text: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::DataIntegrity(format!("stored {column} {text:?}: {e}")))
}

fn parse_row(raw: RawRow) -> Result<WorkItem, StoreError> {
    let status: WorkStatus = raw
        .status
        .parse()
        .map_err(|e| StoreError::DataIntegrity(format!("stored status: {e}")))?;
    Ok(WorkItem {
        timestamp: parse_timestamp("timestamp", &raw.timestamp)?,
        status,
        config: parse_stored_config(&raw.config)?,
        created_at: parse_timestamp("created_at", &raw.created_at)?,
        updated_at: parse_timestamp("updated_at", &raw.updated_at)?,
        sha: raw.sha,
        architecture: raw.architecture,
    })
}
