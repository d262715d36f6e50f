//! DuckDB ledger store implementation

use crate::error::{DbError, DbResult};
use crate::traits::LedgerStore;
use async_trait::async_trait;
use duckdb::{params, Connection};
use mig_core::config::is_valid_identifier;
use mig_core::LedgerRecord;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Default ledger table name
pub const DEFAULT_LEDGER_TABLE: &str = "migrations";

/// DuckDB-backed ledger store
///
/// Migration scripts and ledger writes share one connection, so the ledger
/// always lives in the database it describes.
pub struct DuckDbLedger {
    conn: Mutex<Connection>,
    table: String,
}

impl DuckDbLedger {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }

    /// Use `table` as the ledger table instead of the default
    pub fn with_table(mut self, table: &str) -> DbResult<Self> {
        if !is_valid_identifier(table) {
            return Err(DbError::InvalidConfig(format!(
                "'{table}' is not a valid ledger table name"
            )));
        }
        self.table = table.to_string();
        Ok(self)
    }

    /// Name of the ledger table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Check if a table or view exists in the main schema
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'main' AND table_name = ?",
                params![name],
                |row| row.get(0),
            )
            .map_err(|e| DbError::PersistenceError(e.to_string()))?;
        Ok(count > 0)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn ensure_ledger_table_sync(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                version       BIGINT PRIMARY KEY,
                label         TEXT NOT NULL,
                raw_document  TEXT NOT NULL,
                fingerprint   TEXT NOT NULL,
                apply_script  TEXT NOT NULL,
                revert_script TEXT NOT NULL
            )",
            self.table
        ))
        .map_err(|e| {
            DbError::PersistenceError(format!("failed to create ledger table {}: {e}", self.table))
        })
    }

    fn fetch_ledger_sync(&self) -> DbResult<Vec<LedgerRecord>> {
        let conn = self.lock()?;
        let persistence = |e: duckdb::Error| {
            DbError::PersistenceError(format!("failed to read ledger {}: {e}", self.table))
        };

        let mut stmt = conn
            .prepare(&format!(
                "SELECT version, label, raw_document, fingerprint, apply_script, revert_script FROM {} ORDER BY version",
                self.table
            ))
            .map_err(persistence)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(LedgerRecord {
                    version: row.get(0)?,
                    label: row.get(1)?,
                    raw: row.get(2)?,
                    fingerprint: row.get(3)?,
                    apply: row.get(4)?,
                    revert: row.get(5)?,
                })
            })
            .map_err(persistence)?;

        let records = rows.collect::<Result<Vec<_>, _>>().map_err(persistence)?;
        Ok(records)
    }

    fn execute_sync(&self, statement: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(statement)
            .map_err(|e| DbError::StatementError(e.to_string()))
    }

    fn insert_sync(&self, record: &LedgerRecord) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (version, label, raw_document, fingerprint, apply_script, revert_script) VALUES (?, ?, ?, ?, ?, ?)",
                self.table
            ),
            params![
                record.version,
                record.label,
                record.raw,
                record.fingerprint,
                record.apply,
                record.revert
            ],
        )
        .map_err(|e| {
            DbError::PersistenceError(format!(
                "failed to record migration {}: {e}",
                record.version
            ))
        })?;
        Ok(())
    }

    fn delete_sync(&self, version: i64) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!("DELETE FROM {} WHERE version = ?", self.table),
            params![version],
        )
        .map_err(|e| {
            DbError::PersistenceError(format!("failed to delete migration {version}: {e}"))
        })?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for DuckDbLedger {
    async fn ensure_ledger_table(&self) -> DbResult<()> {
        self.ensure_ledger_table_sync()
    }

    async fn ledger_table_exists(&self) -> DbResult<bool> {
        self.relation_exists(&self.table)
    }

    async fn fetch_ledger(&self) -> DbResult<Vec<LedgerRecord>> {
        self.fetch_ledger_sync()
    }

    async fn execute(&self, statement: &str) -> DbResult<()> {
        log::debug!("Executing against {}: {statement}", self.db_type());
        self.execute_sync(statement)
    }

    async fn insert_ledger_record(&self, record: &LedgerRecord) -> DbResult<()> {
        self.insert_sync(record)
    }

    async fn delete_ledger_record(&self, version: i64) -> DbResult<()> {
        self.delete_sync(version)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
