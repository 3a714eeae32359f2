//! View switching.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use jw_core::model::View;
use jw_store::WorkbenchEvent;

use super::Workbench;

#[derive(Args)]
pub struct ViewArgs {
    /// dashboard, kanban, standup, analytics, settings, integrations, voice
    pub view: String,
}

pub async fn execute(args: ViewArgs, project_dir: &Path) -> Result<()> {
    let view: View = args.view.parse()?;
    let workbench = Workbench::open(project_dir).await?;
    workbench.store.set_current_view(view).await?;
    workbench
        .notifier
        .notify(&WorkbenchEvent::ViewChanged {
            view: view.to_string(),
        })
        .await;

    let screen = workbench.store.screen();
    println!(
        "{} View set to {} (showing {})",
        "✓".green().bold(),
        view.as_str().cyan(),
        screen.title()
    );
    Ok(())
}
