//! New command implementation

use anyhow::{bail, Context, Result};
use mig_core::source::highest_file_version;
use mig_core::{encode, ScriptMarkers};
use std::path::{Path, PathBuf};

use crate::cli::{GlobalArgs, NewArgs};
use crate::context::RuntimeContext;

/// Execute the new command
pub fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let path = create_migration_file(&ctx.migrations_dir(), &args.name, &ctx.config.markers)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Write an empty migration numbered one past the highest existing file.
pub(crate) fn create_migration_file(
    dir: &Path,
    name: &str,
    markers: &ScriptMarkers,
) -> Result<PathBuf> {
    let slug = slugify(name);
    if slug.is_empty() {
        bail!("Migration name '{name}' has no usable characters");
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let Some(version) = highest_file_version(dir)?.checked_add(1) else {
        bail!("{} already holds the highest possible version", dir.display());
    };
    let path = dir.join(format!("{version:04}_{slug}.sql"));
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let mut content = encode("", "", markers);
    content.push('\n');
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::debug!("Created migration {version} at {}", path.display());
    Ok(path)
}

/// Lowercase, with runs of non-alphanumerics collapsed to `_`.
pub(crate) fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
