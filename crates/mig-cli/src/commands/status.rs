//! Status command implementation

use anyhow::{Context, Result};
use mig_runner::{BoundaryReason, MigrationPlan};
use serde_json::json;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::context::RuntimeContext;

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let plan = ctx
        .migrator()?
        .plan()
        .await
        .context("Failed to plan migrations")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan_json(&plan))?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

/// Print a plan in human-readable form
pub(crate) fn print_plan(plan: &MigrationPlan) {
    if plan.is_empty() {
        println!("Up to date ({} applied)", plan.unchanged);
        return;
    }

    if let Some(boundary) = plan.boundary {
        println!(
            "Rollback to version {}: {}",
            boundary.version,
            reason_text(boundary.reason)
        );
    }
    for record in &plan.rollback {
        println!("  down {:>6}  {}", record.version, record.label);
    }
    for migration in &plan.apply {
        println!("  up   {:>6}  {}", migration.version, migration.label);
    }
}

fn reason_text(reason: BoundaryReason) -> &'static str {
    match reason {
        BoundaryReason::ContentChanged => "applied migration was modified",
        BoundaryReason::Removed => "applied migrations were removed",
    }
}

fn plan_json(plan: &MigrationPlan) -> serde_json::Value {
    json!({
        "boundary": plan.boundary.map(|b| json!({
            "version": b.version,
            "reason": reason_text(b.reason),
        })),
        "rollback": plan.rollback.iter().map(|r| json!({
            "version": r.version,
            "label": r.label,
        })).collect::<Vec<_>>(),
        "apply": plan.apply.iter().map(|m| json!({
            "version": m.version,
            "label": m.label,
        })).collect::<Vec<_>>(),
        "unchanged": plan.unchanged,
    })
}
