//! Clear all persisted workbench state.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;
use std::path::Path;

use jw_store::WorkbenchEvent;

use super::Workbench;

#[derive(Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn execute(args: ResetArgs, project_dir: &Path) -> Result<()> {
    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt("Erase onboarding answers, tasks and pulses?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("{}", "Nothing changed.".dimmed());
            return Ok(());
        }
    }

    let workbench = Workbench::open(project_dir).await?;
    workbench.store.reset().await?;
    workbench
        .notifier
        .notify(&WorkbenchEvent::TasksReplaced { count: 0 })
        .await;

    println!("{} Workbench reset. Run {} to start again.", "✓".green().bold(), "jw onboard".cyan());
    Ok(())
}
