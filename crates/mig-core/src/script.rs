//! Single-file migration script codec.
//!
//! A migration document holds both directions of a migration, each section
//! introduced by a marker line:
//!
//! ```text
//! -- up
//! CREATE TABLE users (id INTEGER PRIMARY KEY);
//! -- down
//! DROP TABLE users;
//! ```
//!
//! The sections may appear in either order. File names carry the migration
//! version as a leading run of digits (`0001_create_users.sql`).

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Default marker introducing the apply section
pub const DEFAULT_UP_MARKER: &str = "-- up";

/// Default marker introducing the revert section
pub const DEFAULT_DOWN_MARKER: &str = "-- down";

/// Literal delimiters separating the apply and revert sections of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptMarkers {
    /// Marker preceding the apply (up) script
    #[serde(default = "default_up")]
    pub up: String,

    /// Marker preceding the revert (down) script
    #[serde(default = "default_down")]
    pub down: String,
}

fn default_up() -> String {
    DEFAULT_UP_MARKER.to_string()
}

fn default_down() -> String {
    DEFAULT_DOWN_MARKER.to_string()
}

impl Default for ScriptMarkers {
    fn default() -> Self {
        Self {
            up: default_up(),
            down: default_down(),
        }
    }
}

impl ScriptMarkers {
    /// Create markers from explicit strings
    pub fn new(up: impl Into<String>, down: impl Into<String>) -> Self {
        Self {
            up: up.into(),
            down: down.into(),
        }
    }

    /// Reject markers that cannot be told apart in a document.
    ///
    /// Both markers must be non-empty and neither may contain the other,
    /// otherwise the first occurrence of one could land inside the other.
    pub fn validate(&self) -> CoreResult<()> {
        if self.up.trim().is_empty() || self.down.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "script markers must not be empty".to_string(),
            });
        }
        if self.up.contains(&self.down) || self.down.contains(&self.up) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "script markers '{}' and '{}' overlap; each must not contain the other",
                    self.up, self.down
                ),
            });
        }
        Ok(())
    }
}

/// Serialize an apply/revert pair into a single migration document.
pub fn encode(apply: &str, revert: &str, markers: &ScriptMarkers) -> String {
    format!("{}\n{}\n{}\n{}", markers.up, apply, markers.down, revert)
}

/// Split a migration document into its `(apply, revert)` scripts.
///
/// Each marker is located by its first occurrence. Whichever marker comes
/// first starts its section, which runs until the other marker; the later
/// section runs to the end of the document. Both scripts are trimmed.
pub fn decode(raw: &str, markers: &ScriptMarkers) -> CoreResult<(String, String)> {
    let up_start = find_marker(raw, &markers.up)?;
    let down_start = find_marker(raw, &markers.down)?;

    let (apply, revert) = if up_start < down_start {
        (
            section(raw, up_start + markers.up.len(), down_start),
            section(raw, down_start + markers.down.len(), raw.len()),
        )
    } else {
        (
            section(raw, up_start + markers.up.len(), raw.len()),
            section(raw, down_start + markers.down.len(), up_start),
        )
    };

    Ok((apply.to_string(), revert.to_string()))
}

fn find_marker(raw: &str, marker: &str) -> CoreResult<usize> {
    raw.find(marker).ok_or_else(|| CoreError::MarkerNotFound {
        marker: marker.to_string(),
        label: String::new(),
    })
}

/// Trimmed text between two byte offsets; empty if the offsets cross.
fn section(raw: &str, start: usize, end: usize) -> &str {
    raw.get(start..end).map(str::trim).unwrap_or_default()
}

/// Read the migration version from the leading digits of a file name.
///
/// `"0002: foo.sql"` yields `2` and `"03 - foo.sql"` yields `3`.
pub fn extract_ordering_key(name: &str) -> CoreResult<i64> {
    let end = name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(name.len());
    let digits = &name[..end];

    if digits.is_empty() {
        return Err(CoreError::NoNumberInName {
            name: name.to_string(),
        });
    }

    let version: i64 = digits
        .parse()
        .map_err(|_| CoreError::VersionOutOfRange {
            name: name.to_string(),
        })?;

    if version < 1 {
        return Err(CoreError::NonPositiveVersion {
            name: name.to_string(),
            version,
        });
    }

    Ok(version)
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
