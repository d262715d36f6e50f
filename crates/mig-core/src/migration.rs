//! Migration and ledger record types.

use crate::error::{CoreError, CoreResult};
use crate::fingerprint::fingerprint;
use crate::script::{decode, encode, ScriptMarkers};
use serde::{Deserialize, Serialize};

/// A desired migration: a versioned pair of apply/revert scripts.
///
/// The raw document and fingerprint are derived from the scripts (or read
/// from a migration file) and cannot be set independently, except through
/// [`Migration::with_document`] for hand-built fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Migration {
    /// Position in the total order; always at least 1
    pub version: i64,

    /// Display name, usually the originating file name
    pub label: String,

    /// Statement text run when applying
    pub apply: String,

    /// Statement text run when reverting
    pub revert: String,

    raw: String,
    fingerprint: String,
}

impl Migration {
    /// Create a migration from literal scripts.
    ///
    /// The document and fingerprint stay empty until [`Migration::derive`]
    /// runs, which the source loader does with the configured markers.
    pub fn new(version: i64, apply: impl Into<String>, revert: impl Into<String>) -> Self {
        Self {
            version,
            label: String::new(),
            apply: apply.into(),
            revert: revert.into(),
            raw: String::new(),
            fingerprint: String::new(),
        }
    }

    /// Parse a migration document (typically file content).
    ///
    /// The fingerprint covers the document exactly as read.
    pub fn from_document(
        version: i64,
        label: impl Into<String>,
        raw: impl Into<String>,
        markers: &ScriptMarkers,
    ) -> CoreResult<Self> {
        let label = label.into();
        let raw = raw.into();
        let (apply, revert) = decode(&raw, markers).map_err(|e| match e {
            CoreError::MarkerNotFound { marker, .. } => CoreError::MarkerNotFound {
                marker,
                label: label.clone(),
            },
            other => other,
        })?;
        let fingerprint = fingerprint(&raw);
        Ok(Self {
            version,
            label,
            apply,
            revert,
            raw,
            fingerprint,
        })
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Supply a pre-computed document and fingerprint; [`Migration::derive`]
    /// leaves them untouched afterwards.
    pub fn with_document(mut self, raw: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        self.raw = raw.into();
        self.fingerprint = fingerprint.into();
        self
    }

    /// Fill in the document and fingerprint from the scripts, unless they
    /// are already populated.
    pub fn derive(mut self, markers: &ScriptMarkers) -> Self {
        if self.raw.is_empty() {
            self.raw = encode(&self.apply, &self.revert, markers);
        }
        if self.fingerprint.is_empty() {
            self.fingerprint = fingerprint(&self.raw);
        }
        self
    }

    /// Canonical document combining both scripts
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Content digest of [`Migration::raw`]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Whether the document and fingerprint are populated
    pub fn is_derived(&self) -> bool {
        !self.raw.is_empty() && !self.fingerprint.is_empty()
    }
}

/// A row of the ledger: the frozen snapshot of a migration as it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub version: i64,
    pub label: String,
    pub raw: String,
    pub fingerprint: String,
    pub apply: String,
    pub revert: String,
}

impl From<&Migration> for LedgerRecord {
    fn from(migration: &Migration) -> Self {
        Self {
            version: migration.version,
            label: migration.label.clone(),
            raw: migration.raw.clone(),
            fingerprint: migration.fingerprint.clone(),
            apply: migration.apply.clone(),
            revert: migration.revert.clone(),
        }
    }
}

/// A non-empty, fingerprinted set of migrations in ascending version order
/// with no duplicate versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationSet {
    migrations: Vec<Migration>,
}

impl MigrationSet {
    /// Sort `migrations` by version and validate the result.
    ///
    /// Every migration must already be derived (see [`Migration::derive`]).
    pub fn new(mut migrations: Vec<Migration>) -> CoreResult<Self> {
        if migrations.is_empty() {
            return Err(CoreError::EmptyMigrationSet);
        }

        migrations.sort_by_key(|m| m.version);

        for migration in &migrations {
            if migration.version < 1 {
                return Err(CoreError::NonPositiveVersion {
                    name: migration.label.clone(),
                    version: migration.version,
                });
            }
            if !migration.is_derived() {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "migration {} has no document or fingerprint",
                        migration.version
                    ),
                });
            }
        }

        if let Some(pair) = migrations
            .windows(2)
            .find(|pair| pair[0].version == pair[1].version)
        {
            return Err(CoreError::DuplicateVersion {
                version: pair[0].version,
                first: pair[0].label.clone(),
                second: pair[1].label.clone(),
            });
        }

        Ok(Self { migrations })
    }

    /// Migrations in ascending version order
    pub fn as_slice(&self) -> &[Migration] {
        &self.migrations
    }

    /// Iterate in ascending version order
    pub fn iter(&self) -> std::slice::Iter<'_, Migration> {
        self.migrations.iter()
    }

    /// Number of migrations
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// True when the set holds no migrations
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Lowest desired version
    pub fn first_version(&self) -> i64 {
        self.migrations[0].version
    }

    /// Highest desired version
    pub fn last_version(&self) -> i64 {
        self.migrations[self.migrations.len() - 1].version
    }
}

impl<'a> IntoIterator for &'a MigrationSet {
    type Item = &'a Migration;
    type IntoIter = std::slice::Iter<'a, Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.migrations.iter()
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
