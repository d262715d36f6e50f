//! Error types for mig-db

use thiserror::Error;

/// Ledger store errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// A migration script failed to execute (D002)
    #[error("[D002] Statement execution failed: {0}")]
    StatementError(String),

    /// Reading or writing the ledger table failed (D003)
    #[error("[D003] Ledger persistence failed: {0}")]
    PersistenceError(String),

    /// Invalid store configuration (D004)
    #[error("[D004] Invalid ledger configuration: {0}")]
    InvalidConfig(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
