//! AI agent commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use jw_core::agents::{AgentDesk, AgentKind, AgentTaskStatus};

use super::{spinner, Workbench};

#[derive(Subcommand)]
pub enum AgentCommands {
    /// List the available agents
    List,

    /// Give an agent a task and print its answer
    Run(RunArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Agent id (data-scout, experiment-runner, retro-scribe)
    pub agent: String,

    /// What the agent should do
    pub description: String,
}

pub async fn execute(cmd: AgentCommands, project_dir: &Path) -> Result<()> {
    match cmd {
        AgentCommands::List => {
            for agent in AgentKind::ALL {
                println!(
                    "{} {}",
                    agent.name().truecolor(255, 150, 66).bold(),
                    format!("({})", agent.id()).dimmed()
                );
                println!("  {}", agent.description());
                for capability in agent.capabilities() {
                    println!("    {} {}", "•".dimmed(), capability);
                }
                println!();
            }
        }

        AgentCommands::Run(args) => {
            let agent: AgentKind = args.agent.parse()?;
            let workbench = Workbench::open(project_dir).await?;
            let mut desk = AgentDesk::new();

            let working = spinner(&format!("{} is working...", agent.name()));
            let task = desk
                .assign(agent, &args.description, workbench.ai.as_ref())
                .await;
            working.finish_and_clear();
            let task = task?;

            match task.status {
                AgentTaskStatus::Completed => {
                    println!("{} {}", "✓".green().bold(), task.title.cyan());
                    println!();
                    println!("{}", task.result.unwrap_or_default());
                }
                _ => {
                    println!("{} {} failed", "✗".red().bold(), task.title);
                }
            }
        }
    }

    Ok(())
}
