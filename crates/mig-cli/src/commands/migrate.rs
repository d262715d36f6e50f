//! Migrate command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::status::print_plan;
use crate::context::RuntimeContext;

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrator = ctx.migrator()?;

    if args.dry_run {
        let plan = migrator.plan().await.context("Failed to plan migrations")?;
        print_plan(&plan);
        return Ok(());
    }

    let report = migrator.migrate().await.context("Migration failed")?;

    if report.is_noop() {
        println!("Already up to date ({} applied)", report.unchanged);
    } else {
        println!(
            "Reverted {}, applied {} ({} unchanged) in {}ms",
            report.reverted.len(),
            report.applied.len(),
            report.unchanged,
            report.execution_time_ms
        );
    }
    Ok(())
}
