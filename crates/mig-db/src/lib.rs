//! mig-db - Ledger store layer for mig
//!
//! This crate provides the `LedgerStore` trait the reconciler drives, and a
//! DuckDB implementation that keeps the ledger table next to the schema it
//! describes.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbLedger;
pub use error::{DbError, DbResult};
pub use traits::LedgerStore;
