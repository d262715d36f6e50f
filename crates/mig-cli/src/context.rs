//! Runtime context for CLI commands

use anyhow::{Context, Result};
use mig_core::{Config, CoreError, MigrationSource};
use mig_db::DuckDbLedger;
use mig_runner::{Migrator, MigratorConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Runtime context containing the resolved project configuration
pub struct RuntimeContext {
    /// Project root directory
    pub root: PathBuf,

    /// Loaded configuration with CLI overrides applied
    pub config: Config,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);

        let mut config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            match Config::load_from_dir(&root) {
                Ok(config) => config,
                Err(CoreError::ConfigNotFound { path }) => {
                    log::debug!("No config at {path}; using defaults");
                    Config::default()
                }
                Err(e) => return Err(e).context("Failed to load project configuration"),
            }
        };

        if let Some(database) = &args.database {
            config.database.path = database.clone();
        }
        if let Some(dir) = &args.migrations_dir {
            config.migrations_dir = dir.clone();
        }
        config.validate().context("Invalid configuration")?;

        Ok(Self { root, config })
    }

    /// Directory holding migration files
    pub fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_dir_absolute(&self.root)
    }

    /// Open the configured DuckDB ledger
    pub fn open_store(&self) -> Result<Arc<DuckDbLedger>> {
        let path = self.config.database_path(&self.root);
        log::debug!("Opening database {path}");
        let store = DuckDbLedger::new(&path)
            .and_then(|db| db.with_table(&self.config.database.ledger_table))
            .with_context(|| format!("Failed to open database {path}"))?;
        Ok(Arc::new(store))
    }

    /// Build a migrator over the project's migrations directory
    pub fn migrator(&self) -> Result<Migrator> {
        let store = self.open_store()?;
        let source = MigrationSource::subdirectory(&self.root, &self.config.migrations_dir);
        let config = MigratorConfig::new(source)
            .with_store(store)
            .with_markers(self.config.markers.clone());
        Migrator::new(config).context("Failed to configure migrator")
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
