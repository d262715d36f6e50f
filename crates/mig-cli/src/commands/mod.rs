//! CLI command implementations

pub mod history;
pub mod migrate;
pub mod new;
pub mod status;
