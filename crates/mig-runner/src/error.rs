//! Error types for mig-runner

use mig_core::CoreError;
use mig_db::DbError;
use std::fmt;
use thiserror::Error;

/// Which part of a run an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Creating or reading the ledger
    Ledger,
    /// Reverting migrations
    Down,
    /// Applying migrations
    Up,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Ledger => write!(f, "ledger"),
            Phase::Down => write!(f, "down"),
            Phase::Up => write!(f, "up"),
        }
    }
}

/// Reconciliation errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// R001: No store configured, no migrations, or an invalid desired set
    #[error("[R001] Configuration error: {0}")]
    Configuration(String),

    /// R002: A migration file name or document could not be parsed
    #[error("[R002] Failed to load migrations: {0}")]
    Parse(#[source] CoreError),

    /// R003: Ledger and desired set disagree on which version sits at a position
    #[error("[R003] Ledger and desired migrations disagree at position {position}: ledger has version {ledger_version}, desired has version {desired_version}")]
    StructuralMismatch {
        position: usize,
        ledger_version: i64,
        desired_version: i64,
    },

    /// R004: An apply or revert script failed
    #[error("[R004] Error running {phase} migration {version}: {source}")]
    Statement {
        phase: Phase,
        version: i64,
        #[source]
        source: DbError,
    },

    /// R005: Reading or writing the ledger failed
    #[error("[R005] Ledger {phase} write failed for migration {version}: {source}")]
    Persistence {
        phase: Phase,
        version: i64,
        #[source]
        source: DbError,
    },

    /// R006: The ledger could not be created or read
    #[error("[R006] Failed to access ledger: {0}")]
    LedgerRead(#[source] DbError),
}

impl MigrateError {
    /// Phase the error belongs to, when it came from running migrations
    pub fn phase(&self) -> Option<Phase> {
        match self {
            MigrateError::Statement { phase, .. } | MigrateError::Persistence { phase, .. } => {
                Some(*phase)
            }
            MigrateError::LedgerRead(_) => Some(Phase::Ledger),
            _ => None,
        }
    }

    /// Version the error belongs to, when one is known
    pub fn version(&self) -> Option<i64> {
        match self {
            MigrateError::Statement { version, .. } | MigrateError::Persistence { version, .. } => {
                Some(*version)
            }
            MigrateError::StructuralMismatch { ledger_version, .. } => Some(*ledger_version),
            _ => None,
        }
    }
}

impl From<CoreError> for MigrateError {
    fn from(err: CoreError) -> Self {
        if err.is_configuration() {
            MigrateError::Configuration(err.to_string())
        } else {
            MigrateError::Parse(err)
        }
    }
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
