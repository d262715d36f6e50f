//! Error types for mig-core

use thiserror::Error;

/// Core error type for mig
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Migration file name has no leading number
    #[error("[C003] No number found at the start of migration name '{name}'")]
    NoNumberInName { name: String },

    /// C004: Leading number parsed to a version below 1
    #[error("[C004] Migration version must be greater than 0, found {version} in '{name}'")]
    NonPositiveVersion { name: String, version: i64 },

    /// C005: Leading number does not fit a 64-bit version
    #[error("[C005] Migration version in '{name}' is out of range")]
    VersionOutOfRange { name: String },

    /// C006: A script marker is absent from a migration document
    #[error("[C006] Marker '{marker}' not found in migration document{}", label_suffix(.label))]
    MarkerNotFound { marker: String, label: String },

    /// C007: Two migrations share a version
    #[error("[C007] Duplicate migration version {version}: '{first}' and '{second}'")]
    DuplicateVersion {
        version: i64,
        first: String,
        second: String,
    },

    /// C008: No migrations supplied
    #[error("[C008] No migrations provided")]
    EmptyMigrationSet,

    /// C009: IO error with file path context
    #[error("[C009] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C010: YAML parse error
    #[error("[C010] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl CoreError {
    /// Whether this error describes bad configuration rather than bad input
    /// text (file names, documents).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CoreError::ConfigNotFound { .. }
                | CoreError::ConfigInvalid { .. }
                | CoreError::DuplicateVersion { .. }
                | CoreError::EmptyMigrationSet
        )
    }
}

fn label_suffix(label: &str) -> String {
    if label.is_empty() {
        String::new()
    } else {
        format!(" '{label}'")
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
