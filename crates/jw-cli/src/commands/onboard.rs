//! Onboarding conversation in the terminal.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Input;
use std::path::Path;

use jw_core::onboarding::{self, OnboardingSession, OnboardingStep, COMPLETION_MESSAGE};
use jw_store::WorkbenchEvent;

use super::{spinner, Workbench};

pub async fn execute(project_dir: &Path) -> Result<()> {
    let workbench = Workbench::open(project_dir).await?;
    let store = &workbench.store;

    if store.onboarding().is_complete {
        println!(
            "{} Onboarding is already complete. Run {} to start over.",
            "✓".green().bold(),
            "jw reset".cyan()
        );
        return Ok(());
    }

    let mut session = OnboardingSession::new(workbench.config.timing.thinking());
    if let Some(greeting) = session.messages().first() {
        println!("{} {}", "AI".truecolor(255, 150, 66).bold(), greeting.content);
    }

    loop {
        println!("{}", session.progress_label().dimmed());
        let answer: String = Input::new()
            .with_prompt("You")
            .interact_text()
            .context("Failed to read answer")?;

        let thinking = spinner("Thinking...");
        let step = session.submit_answer(store, &answer).await;
        thinking.finish_and_clear();

        match step? {
            OnboardingStep::Ignored => continue,
            OnboardingStep::Next { question, .. } => {
                println!("{} {}", "AI".truecolor(255, 150, 66).bold(), question);
            }
            OnboardingStep::Complete => {
                println!("{} {}", "AI".truecolor(255, 150, 66).bold(), COMPLETION_MESSAGE);
                break;
            }
        }
    }

    let drafting = spinner("Drafting your first backlog...");
    let backlog = onboarding::launch_workbench(store, workbench.ai.as_ref()).await?;
    drafting.finish_and_clear();

    if backlog.is_empty() {
        println!("{}", "No backlog drafted. Add tasks with 'jw task new <title>'.".dimmed());
    } else {
        println!();
        println!("{}", "Parking lot".bold());
        for task in &backlog {
            println!("  {} {}", "•".dimmed(), task.title);
        }
    }

    workbench
        .notifier
        .notify(&WorkbenchEvent::OnboardingUpdated { is_complete: true })
        .await;
    println!();
    println!("{} Workbench ready. Try {}", "✓".green().bold(), "jw task board".cyan());
    Ok(())
}
