//! Ledger store trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use mig_core::LedgerRecord;

/// Persistence and execution backend for migrations.
///
/// The store owns the ledger table: one row per applied migration, holding
/// the migration exactly as it was applied. Implementations must be
/// Send + Sync for async operation. Callers are expected to be the only
/// writer to the ledger while a reconciliation runs.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create the ledger table if it does not exist
    async fn ensure_ledger_table(&self) -> DbResult<()>;

    /// Whether the ledger table has been created
    async fn ledger_table_exists(&self) -> DbResult<bool>;

    /// All ledger records in ascending version order
    async fn fetch_ledger(&self) -> DbResult<Vec<LedgerRecord>>;

    /// Run one migration script (which may contain several statements)
    async fn execute(&self, statement: &str) -> DbResult<()>;

    /// Record a migration as applied
    async fn insert_ledger_record(&self, record: &LedgerRecord) -> DbResult<()>;

    /// Remove the ledger record for `version`
    async fn delete_ledger_record(&self, version: i64) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
