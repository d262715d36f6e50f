//! Reconciliation planning.
//!
//! Pure functions over the ledger and the desired set. The ledger is walked
//! pairwise against the desired migrations: the first fingerprint that
//! differs marks the rollback boundary; if the whole overlap matches but the
//! ledger is longer, everything past the last desired version is rolled
//! back. Forward application then resumes one past the highest version left
//! in the ledger.

use crate::error::{MigrateError, MigrateResult};
use mig_core::{LedgerRecord, Migration, MigrationSet};

/// Why a rollback boundary was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryReason {
    /// An applied migration's content no longer matches its definition
    ContentChanged,
    /// Applied migrations are missing from the desired set
    Removed,
}

/// Lowest version that must be reverted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollbackBoundary {
    pub version: i64,
    pub reason: BoundaryReason,
}

/// Everything a run would do, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Drift point, if anything has to be reverted
    pub boundary: Option<RollbackBoundary>,

    /// Ledger records to revert, highest version first
    pub rollback: Vec<LedgerRecord>,

    /// Migrations to apply, lowest version first
    pub apply: Vec<Migration>,

    /// Ledger records left in place
    pub unchanged: usize,
}

impl MigrationPlan {
    /// True when the ledger already matches the desired set
    pub fn is_empty(&self) -> bool {
        self.rollback.is_empty() && self.apply.is_empty()
    }
}

/// Order ledger records by ascending version.
pub fn sort_ledger(records: &mut [LedgerRecord]) {
    records.sort_by_key(|r| r.version);
}

/// Find the rollback boundary. `applied` must be sorted by version.
///
/// Fails with [`MigrateError::StructuralMismatch`] when the two sequences
/// hold different versions at the same position.
pub fn rollback_boundary(
    applied: &[LedgerRecord],
    desired: &MigrationSet,
) -> MigrateResult<Option<RollbackBoundary>> {
    for (position, (record, migration)) in applied.iter().zip(desired.iter()).enumerate() {
        if record.version != migration.version {
            return Err(MigrateError::StructuralMismatch {
                position,
                ledger_version: record.version,
                desired_version: migration.version,
            });
        }

        if record.fingerprint != migration.fingerprint() {
            return Ok(Some(RollbackBoundary {
                version: record.version,
                reason: BoundaryReason::ContentChanged,
            }));
        }
    }

    if applied.len() > desired.len() {
        return Ok(Some(RollbackBoundary {
            version: desired.last_version() + 1,
            reason: BoundaryReason::Removed,
        }));
    }

    Ok(None)
}

/// Ledger records at or above `boundary`, highest version first.
/// `applied` must be sorted by version.
pub fn rollback_targets(applied: &[LedgerRecord], boundary: i64) -> Vec<&LedgerRecord> {
    applied
        .iter()
        .rev()
        .take_while(|record| record.version >= boundary)
        .collect()
}

/// Version forward application starts at: one past the highest version in
/// `ledger`, or the lowest desired version when the ledger is empty.
/// `None` when the ledger already holds `i64::MAX`, leaving nothing to apply.
pub fn forward_start(ledger: &[LedgerRecord], desired: &MigrationSet) -> Option<i64> {
    match ledger.iter().map(|record| record.version).max() {
        Some(highest) => highest.checked_add(1),
        None => Some(desired.first_version()),
    }
}

/// Desired migrations at or above `start`, lowest version first.
pub fn forward_targets(desired: &MigrationSet, start: i64) -> Vec<&Migration> {
    desired.iter().filter(|m| m.version >= start).collect()
}

/// Compute the full plan without touching the store.
pub fn compute_plan(applied: &[LedgerRecord], desired: &MigrationSet) -> MigrateResult<MigrationPlan> {
    let mut applied = applied.to_vec();
    sort_ledger(&mut applied);

    let boundary = rollback_boundary(&applied, desired)?;
    let rollback: Vec<LedgerRecord> = match boundary {
        Some(b) => rollback_targets(&applied, b.version)
            .into_iter()
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let remaining = &applied[..applied.len() - rollback.len()];
    let apply = match forward_start(remaining, desired) {
        Some(start) => forward_targets(desired, start).into_iter().cloned().collect(),
        None => Vec::new(),
    };

    Ok(MigrationPlan {
        boundary,
        rollback,
        apply,
        unchanged: remaining.len(),
    })
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
