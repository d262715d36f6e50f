//! Migration source loading.
//!
//! A source is either a directory of single-file migrations or a list of
//! migrations supplied in code. Loading always yields a fresh
//! [`MigrationSet`]; the source itself is never modified.

use crate::error::{CoreError, CoreResult};
use crate::migration::{Migration, MigrationSet};
use crate::script::{extract_ordering_key, ScriptMarkers};
use std::path::{Path, PathBuf};

/// Where the desired migrations come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationSource {
    /// Files directly inside `root`, or inside `root/subdir` when set
    Directory {
        root: PathBuf,
        subdir: Option<PathBuf>,
    },

    /// Migrations supplied literally
    Literal(Vec<Migration>),
}

impl MigrationSource {
    /// Source reading every file directly inside `root`
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        MigrationSource::Directory {
            root: root.into(),
            subdir: None,
        }
    }

    /// Source reading files from `subdir` within `root`
    pub fn subdirectory(root: impl Into<PathBuf>, subdir: impl Into<PathBuf>) -> Self {
        MigrationSource::Directory {
            root: root.into(),
            subdir: Some(subdir.into()),
        }
    }

    /// Source over literal migrations
    pub fn literal(migrations: Vec<Migration>) -> Self {
        MigrationSource::Literal(migrations)
    }

    /// Directory the migration files live in, if this is a directory source
    pub fn dir(&self) -> Option<PathBuf> {
        match self {
            MigrationSource::Directory { root, subdir } => {
                Some(resolve_dir(root, subdir.as_deref()))
            }
            MigrationSource::Literal(_) => None,
        }
    }

    /// Load, fingerprint, and order the desired migrations.
    pub fn load(&self, markers: &ScriptMarkers) -> CoreResult<MigrationSet> {
        let migrations = match self {
            MigrationSource::Directory { root, subdir } => {
                load_directory(&resolve_dir(root, subdir.as_deref()), markers)?
            }
            MigrationSource::Literal(migrations) => migrations
                .iter()
                .cloned()
                .map(|m| m.derive(markers))
                .collect(),
        };
        log::debug!("Loaded {} migration(s)", migrations.len());
        MigrationSet::new(migrations)
    }
}

fn resolve_dir(root: &Path, subdir: Option<&Path>) -> PathBuf {
    match subdir {
        Some(sub) => root.join(sub),
        None => root.to_path_buf(),
    }
}

/// Read every migration file in `dir`.
///
/// Sub-directories and hidden files are skipped; every other file must start
/// with its version number. The result is unsorted.
pub fn load_directory(dir: &Path, markers: &ScriptMarkers) -> CoreResult<Vec<Migration>> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    let mut migrations = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();

        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            log::debug!("Skipping hidden file {}", path.display());
            continue;
        }

        let version = extract_ordering_key(&file_name)?;
        let raw = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        migrations.push(Migration::from_document(version, file_name, raw, markers)?);
    }

    Ok(migrations)
}

/// Highest version among the file names in `dir`, ignoring names without a
/// valid leading number. Returns 0 for an empty or missing directory.
pub fn highest_file_version(dir: &Path) -> CoreResult<i64> {
    if !dir.exists() {
        return Ok(0);
    }

    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    let mut highest = 0;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        if let Ok(version) = extract_ordering_key(&entry.file_name().to_string_lossy()) {
            highest = highest.max(version);
        }
    }

    Ok(highest)
}

fn io_err(path: &Path, source: std::io::Error) -> CoreError {
    CoreError::IoWithPath {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
