//! Happiness pulse commands.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use jw_core::pulse::{self, CURRENT_USER, LEVELS};
use jw_store::WorkbenchEvent;

use super::Workbench;
use crate::output;

#[derive(Subcommand)]
pub enum PulseCommands {
    /// Record this month's happiness score
    Submit(SubmitArgs),

    /// Show the team summary
    Summary,

    /// List the five happiness levels
    Levels,
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Score from 1 (very unhappy) to 5 (very happy)
    pub score: u8,

    /// One thing that would make work better
    #[arg(short, long, default_value = "")]
    pub suggestion: String,

    /// Submit on behalf of this user id
    #[arg(short, long)]
    pub user: Option<String>,
}

pub async fn execute(cmd: PulseCommands, project_dir: &Path) -> Result<()> {
    let workbench = Workbench::open(project_dir).await?;
    let store = &workbench.store;

    match cmd {
        PulseCommands::Submit(args) => {
            let user_id = args
                .user
                .or_else(|| store.user().map(|u| u.id))
                .unwrap_or_else(|| CURRENT_USER.to_string());
            let pulse =
                pulse::submit(store, &user_id, args.score, &args.suggestion, Utc::now()).await?;
            workbench
                .notifier
                .notify(&WorkbenchEvent::PulseSubmitted {
                    user_id: pulse.user_id.clone(),
                    month: pulse.month.clone(),
                })
                .await;

            let label = pulse::level(pulse.score).map(|l| l.label).unwrap_or_default();
            println!(
                "{} Thanks! Pulse recorded for {} ({})",
                "✓".green().bold(),
                pulse.month.cyan(),
                label
            );
        }

        PulseCommands::Summary => {
            output::print_pulse_summary(&pulse::team_summary(store));
        }

        PulseCommands::Levels => {
            for level in &LEVELS {
                println!("  {} {}", level.value.to_string().bold(), level.label);
            }
        }
    }

    Ok(())
}
