//! In-memory ledger store that records every call, for reconciler tests.

use async_trait::async_trait;
use mig_core::LedgerRecord;
use mig_db::{DbError, DbResult, LedgerStore};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One call made against a [`RecordingLedger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    EnsureTable,
    CheckTable,
    Fetch,
    Execute(String),
    Insert(i64),
    Delete(i64),
}

#[derive(Default)]
struct State {
    table_created: bool,
    ledger: BTreeMap<i64, LedgerRecord>,
    events: Vec<LedgerEvent>,
    failing_statements: HashSet<String>,
    failing_inserts: HashSet<i64>,
    failing_deletes: HashSet<i64>,
}

/// Ledger store backed by a map, logging calls in order
#[derive(Default)]
pub struct RecordingLedger {
    state: Mutex<State>,
}

impl RecordingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger with existing records
    pub fn with_records(records: impl IntoIterator<Item = LedgerRecord>) -> Self {
        let ledger = Self::new();
        {
            let mut state = ledger.lock();
            state.table_created = true;
            for record in records {
                state.ledger.insert(record.version, record);
            }
        }
        ledger
    }

    /// Make `execute(statement)` fail
    pub fn fail_statement(&self, statement: &str) {
        self.lock().failing_statements.insert(statement.to_string());
    }

    /// Make inserting `version` fail
    pub fn fail_insert(&self, version: i64) {
        self.lock().failing_inserts.insert(version);
    }

    /// Make deleting `version` fail
    pub fn fail_delete(&self, version: i64) {
        self.lock().failing_deletes.insert(version);
    }

    /// Every call so far, in order
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.lock().events.clone()
    }

    /// Statements executed so far, in order
    pub fn statements(&self) -> Vec<String> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                LedgerEvent::Execute(sql) => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }

    /// Executions, inserts and deletes so far, in order
    pub fn mutations(&self) -> Vec<LedgerEvent> {
        self.lock()
            .events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    LedgerEvent::Execute(_) | LedgerEvent::Insert(_) | LedgerEvent::Delete(_)
                )
            })
            .cloned()
            .collect()
    }

    /// Forget recorded calls
    pub fn clear_events(&self) {
        self.lock().events.clear();
    }

    /// Current ledger contents in ascending version order
    pub fn records(&self) -> Vec<LedgerRecord> {
        self.lock().ledger.values().cloned().collect()
    }

    /// Versions currently in the ledger
    pub fn versions(&self) -> Vec<i64> {
        self.lock().ledger.keys().copied().collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LedgerStore for RecordingLedger {
    async fn ensure_ledger_table(&self) -> DbResult<()> {
        let mut state = self.lock();
        state.events.push(LedgerEvent::EnsureTable);
        state.table_created = true;
        Ok(())
    }

    async fn ledger_table_exists(&self) -> DbResult<bool> {
        let mut state = self.lock();
        state.events.push(LedgerEvent::CheckTable);
        Ok(state.table_created)
    }

    async fn fetch_ledger(&self) -> DbResult<Vec<LedgerRecord>> {
        let mut state = self.lock();
        state.events.push(LedgerEvent::Fetch);
        // Hand records back newest first so callers cannot rely on order.
        Ok(state.ledger.values().rev().cloned().collect())
    }

    async fn execute(&self, statement: &str) -> DbResult<()> {
        let mut state = self.lock();
        state
            .events
            .push(LedgerEvent::Execute(statement.to_string()));
        if state.failing_statements.contains(statement) {
            return Err(DbError::StatementError(format!("forced failure: {statement}")));
        }
        Ok(())
    }

    async fn insert_ledger_record(&self, record: &LedgerRecord) -> DbResult<()> {
        let mut state = self.lock();
        state.events.push(LedgerEvent::Insert(record.version));
        if state.failing_inserts.contains(&record.version) {
            return Err(DbError::PersistenceError(format!(
                "forced insert failure for {}",
                record.version
            )));
        }
        if state.ledger.contains_key(&record.version) {
            return Err(DbError::PersistenceError(format!(
                "duplicate version {}",
                record.version
            )));
        }
        state.ledger.insert(record.version, record.clone());
        Ok(())
    }

    async fn delete_ledger_record(&self, version: i64) -> DbResult<()> {
        let mut state = self.lock();
        state.events.push(LedgerEvent::Delete(version));
        if state.failing_deletes.contains(&version) {
            return Err(DbError::PersistenceError(format!(
                "forced delete failure for {version}"
            )));
        }
        state.ledger.remove(&version);
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "recording"
    }
}
