//! mig-runner - Reconciler for mig
//!
//! Compares the desired migrations against the ledger of applied ones,
//! reverts everything from the first point of drift upward, then applies
//! whatever the ledger is missing.

pub mod error;
pub mod plan;
pub mod report;
pub mod runner;
#[cfg(test)]
pub(crate) mod testing;

pub use error::{MigrateError, MigrateResult, Phase};
pub use plan::{compute_plan, BoundaryReason, MigrationPlan, RollbackBoundary};
pub use report::MigrationReport;
pub use runner::{Migrator, MigratorConfig};
