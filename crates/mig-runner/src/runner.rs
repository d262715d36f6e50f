//! Migration runner: drives a plan against a ledger store.
//!
//! A run reads the ledger once, reverts from the highest version down to the
//! rollback boundary, re-reads the ledger, then applies the missing
//! migrations in ascending order. Every step is awaited before the next one
//! starts: statement order is what keeps dependent objects consistent.
//!
//! Runs fail fast. Whatever was reverted or applied before the failing step
//! stays reverted or applied, and the next run resumes from the ledger.
//!
//! Only one runner may work against a given ledger at a time; nothing here
//! guards against concurrent runs.

use crate::error::{MigrateError, MigrateResult, Phase};
use crate::plan::{
    compute_plan, forward_start, forward_targets, rollback_boundary, rollback_targets,
    sort_ledger, BoundaryReason, MigrationPlan,
};
use crate::report::MigrationReport;
use mig_core::{LedgerRecord, MigrationSet, MigrationSource, ScriptMarkers};
use mig_db::LedgerStore;
use std::sync::Arc;
use std::time::Instant;

/// Settings for a [`Migrator`]; fixed once the migrator is built
#[derive(Clone)]
pub struct MigratorConfig {
    /// Store holding the ledger and executing scripts
    pub store: Option<Arc<dyn LedgerStore>>,

    /// Where desired migrations are read from
    pub source: MigrationSource,

    /// Section markers for migration documents
    pub markers: ScriptMarkers,
}

impl MigratorConfig {
    /// Config with the given source, default markers and no store
    pub fn new(source: MigrationSource) -> Self {
        Self {
            store: None,
            source,
            markers: ScriptMarkers::default(),
        }
    }

    /// Set the ledger store
    pub fn with_store(mut self, store: Arc<dyn LedgerStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the section markers
    pub fn with_markers(mut self, markers: ScriptMarkers) -> Self {
        self.markers = markers;
        self
    }
}

/// Reconciles a migration source against a ledger store
pub struct Migrator {
    store: Arc<dyn LedgerStore>,
    source: MigrationSource,
    markers: ScriptMarkers,
}

impl Migrator {
    /// Build a migrator, rejecting configs with no store or no migrations.
    pub fn new(config: MigratorConfig) -> MigrateResult<Self> {
        let store = config
            .store
            .ok_or_else(|| MigrateError::Configuration("no ledger store configured".to_string()))?;

        if matches!(&config.source, MigrationSource::Literal(list) if list.is_empty()) {
            return Err(MigrateError::Configuration(
                "no migrations provided".to_string(),
            ));
        }

        config.markers.validate()?;

        Ok(Self {
            store,
            source: config.source,
            markers: config.markers,
        })
    }

    /// The section markers
    pub fn markers(&self) -> &ScriptMarkers {
        &self.markers
    }

    /// Read the desired migrations from the source.
    pub fn load_desired(&self) -> MigrateResult<MigrationSet> {
        Ok(self.source.load(&self.markers)?)
    }

    /// Compute what [`Migrator::migrate`] would do, without doing it.
    /// A missing ledger table reads as an empty ledger and is not created.
    pub async fn plan(&self) -> MigrateResult<MigrationPlan> {
        let desired = self.load_desired()?;
        let applied = self.fetch_if_exists().await?;
        compute_plan(&applied, &desired)
    }

    /// Bring the ledger in line with the source.
    pub async fn migrate(&self) -> MigrateResult<MigrationReport> {
        let desired = self.load_desired()?;
        self.reconcile(&desired).await
    }

    /// Bring the ledger in line with `desired`.
    pub async fn reconcile(&self, desired: &MigrationSet) -> MigrateResult<MigrationReport> {
        let started = Instant::now();
        let mut report = MigrationReport::default();

        self.ensure_ledger().await?;
        let applied = self.fetch_sorted().await?;

        let boundary = rollback_boundary(&applied, desired)?;
        report.boundary = boundary;

        let ledger = match boundary {
            Some(b) => {
                match b.reason {
                    BoundaryReason::ContentChanged => log::warn!(
                        "Migration {} changed since it was applied; rolling back to it",
                        b.version
                    ),
                    BoundaryReason::Removed => log::warn!(
                        "Applied migrations from {} on are no longer defined; rolling them back",
                        b.version
                    ),
                }
                self.run_down(&applied, b.version, &mut report).await?;
                self.fetch_sorted().await?
            }
            None => applied,
        };

        report.unchanged = ledger.len();
        match forward_start(&ledger, desired) {
            Some(start) => {
                log::debug!("Forward run starts at version {start}");
                self.run_up(desired, start, &mut report).await?;
            }
            None => log::debug!("Ledger holds the highest possible version; nothing to apply"),
        }

        report.execution_time_ms = started.elapsed().as_millis();
        if report.is_noop() {
            log::info!("Database is up to date");
        } else {
            log::info!(
                "Reverted {} and applied {} migration(s) in {}ms",
                report.reverted.len(),
                report.applied.len(),
                report.execution_time_ms
            );
        }
        Ok(report)
    }

    /// Ledger records in ascending version order. Empty when the ledger
    /// table has not been created yet.
    pub async fn history(&self) -> MigrateResult<Vec<LedgerRecord>> {
        self.fetch_if_exists().await
    }

    async fn ensure_ledger(&self) -> MigrateResult<()> {
        self.store
            .ensure_ledger_table()
            .await
            .map_err(MigrateError::LedgerRead)
    }

    async fn fetch_if_exists(&self) -> MigrateResult<Vec<LedgerRecord>> {
        let exists = self
            .store
            .ledger_table_exists()
            .await
            .map_err(MigrateError::LedgerRead)?;
        if !exists {
            log::debug!("Ledger table not created yet; treating ledger as empty");
            return Ok(Vec::new());
        }
        self.fetch_sorted().await
    }

    async fn fetch_sorted(&self) -> MigrateResult<Vec<LedgerRecord>> {
        let mut records = self
            .store
            .fetch_ledger()
            .await
            .map_err(MigrateError::LedgerRead)?;
        sort_ledger(&mut records);
        Ok(records)
    }

    async fn run_down(
        &self,
        applied: &[LedgerRecord],
        boundary: i64,
        report: &mut MigrationReport,
    ) -> MigrateResult<()> {
        for record in rollback_targets(applied, boundary) {
            self.store
                .execute(&record.revert)
                .await
                .map_err(|source| MigrateError::Statement {
                    phase: Phase::Down,
                    version: record.version,
                    source,
                })?;

            self.store
                .delete_ledger_record(record.version)
                .await
                .map_err(|source| MigrateError::Persistence {
                    phase: Phase::Down,
                    version: record.version,
                    source,
                })?;

            log::info!("Reverted migration {} ({})", record.version, record.label);
            report.reverted.push(record.version);
        }
        Ok(())
    }

    async fn run_up(
        &self,
        desired: &MigrationSet,
        start: i64,
        report: &mut MigrationReport,
    ) -> MigrateResult<()> {
        for migration in forward_targets(desired, start) {
            self.store
                .execute(&migration.apply)
                .await
                .map_err(|source| MigrateError::Statement {
                    phase: Phase::Up,
                    version: migration.version,
                    source,
                })?;

            self.store
                .insert_ledger_record(&LedgerRecord::from(migration))
                .await
                .map_err(|source| MigrateError::Persistence {
                    phase: Phase::Up,
                    version: migration.version,
                    source,
                })?;

            log::info!("Applied migration {} ({})", migration.version, migration.label);
            report.applied.push(migration.version);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
