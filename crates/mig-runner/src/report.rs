//! Outcome of a reconciliation run

use crate::plan::RollbackBoundary;

/// What a `migrate` call changed
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    /// Drift point that triggered rollback, if any
    pub boundary: Option<RollbackBoundary>,

    /// Versions reverted, in execution order (highest first)
    pub reverted: Vec<i64>,

    /// Versions applied, in execution order (lowest first)
    pub applied: Vec<i64>,

    /// Ledger records left in place
    pub unchanged: usize,

    /// Total execution time in milliseconds
    pub execution_time_ms: u128,
}

impl MigrationReport {
    /// True when the run neither reverted nor applied anything
    pub fn is_noop(&self) -> bool {
        self.reverted.is_empty() && self.applied.is_empty()
    }
}
