//! Daily stand-up in the terminal.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Select;
use std::path::Path;

use jw_core::model::team::sample_team;
use jw_core::standup::{self, StandupSession, COMPLETION_SUMMARY};
use jw_store::WorkbenchEvent;

use super::{spinner, Workbench};

const ACTIONS: [&str; 3] = ["Record answer", "Skip", "End stand-up"];

pub async fn execute(project_dir: &Path) -> Result<()> {
    let workbench = Workbench::open(project_dir).await?;
    let store = &workbench.store;
    let timing = &workbench.config.timing;

    let members = match store.team_members() {
        members if members.is_empty() => sample_team(),
        members => members,
    };
    let mut session =
        StandupSession::with_members(members, timing.standup_advance(), timing.easter_egg());

    standup::start(store).await?;
    workbench
        .notifier
        .notify(&WorkbenchEvent::StandupModeChanged { active: true })
        .await;

    println!("{}", "Daily Stand-up".truecolor(255, 150, 66).bold());

    while !session.is_complete() {
        let progress = session.progress();
        println!();
        println!(
            "{} {}  {}",
            progress.member.bold(),
            format!("({})", session.position_label()).dimmed(),
            format!("{:?}", progress.phase).cyan()
        );
        println!("  {}", progress.question);

        let choice = Select::new()
            .items(&ACTIONS)
            .default(0)
            .interact()
            .context("Failed to read choice")?;

        match choice {
            0 => {
                session.start_recording()?;
                let listening = spinner("Listening...");
                let member_id = session.current_member().map(|m| m.id.clone());
                let phase = session.phase();
                session.stop_recording().await?;
                listening.finish_and_clear();
                if let Some(transcript) = member_id
                    .as_deref()
                    .and_then(|id| session.response(id, phase))
                {
                    println!("  {} {}", "“".dimmed(), transcript.italic());
                }
            }
            1 => {
                session.advance()?;
            }
            _ => break,
        }
    }

    if session.is_complete() {
        println!();
        println!("{} {}", "✓".green().bold(), COMPLETION_SUMMARY);
    }

    standup::finish(store).await?;
    workbench
        .notifier
        .notify(&WorkbenchEvent::StandupModeChanged { active: false })
        .await;
    Ok(())
}
