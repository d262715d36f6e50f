//! mig-core - Core library for mig
//!
//! This crate provides the migration data model, content fingerprinting, the
//! single-file up/down script codec, migration source loading, and project
//! configuration shared by the runner and the CLI.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod migration;
pub mod script;
pub mod source;

pub use config::{Config, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use fingerprint::fingerprint;
pub use migration::{LedgerRecord, Migration, MigrationSet};
pub use script::{decode, encode, extract_ordering_key, ScriptMarkers};
pub use source::MigrationSource;
