//! History command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, HistoryArgs};
use crate::context::RuntimeContext;

/// Execute the history command
pub async fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let records = ctx
        .migrator()?
        .history()
        .await
        .context("Failed to read ledger")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No migrations applied");
        return Ok(());
    }

    println!("{:>7}  {:<10}  LABEL", "VERSION", "HASH");
    for record in &records {
        println!(
            "{:>7}  {:<10}  {}",
            record.version, record.fingerprint, record.label
        );
    }
    Ok(())
}
