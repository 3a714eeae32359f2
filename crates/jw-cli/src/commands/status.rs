//! Workbench status.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use jw_core::dashboard;

use super::Workbench;
use crate::output;

#[derive(Args)]
pub struct StatusArgs {
    /// Print the raw store state as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: StatusArgs, project_dir: &Path) -> Result<()> {
    let workbench = Workbench::open(project_dir).await?;
    let store = &workbench.store;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        return Ok(());
    }

    let screen = store.screen();
    println!(
        "{} {} {}",
        "Jungwell".truecolor(255, 150, 66).bold(),
        "·".dimmed(),
        screen.title().bold()
    );
    println!(
        "{}",
        format!(
            "view: {}  onboarding: {}",
            store.current_view(),
            if store.onboarding().is_complete { "complete" } else { "pending" }
        )
        .dimmed()
    );
    println!();

    if !store.onboarding().is_complete {
        println!("Run {} to set up your workbench.", "jw onboard".cyan());
        return Ok(());
    }

    output::print_overview(&dashboard::overview(store));
    Ok(())
}
