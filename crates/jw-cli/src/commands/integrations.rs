//! Integration hub commands.
//!
//! Connection state lives for the length of one command, so each command
//! starts from the default catalogue.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Input;
use std::path::Path;

use jw_core::integrations::{ConnectOutcome, IntegrationConfig, IntegrationHub};

use super::{spinner, Workbench};
use crate::output;

#[derive(Subcommand)]
pub enum IntegrationCommands {
    /// List every integration with its status
    List,

    /// Connect an integration
    Connect(ConnectArgs),

    /// Run a sync
    Sync(IntegrationIdArgs),

    /// Disconnect an integration
    Disconnect(IntegrationIdArgs),
}

#[derive(Args)]
pub struct ConnectArgs {
    /// Integration id (e.g. salesforce, gainsight)
    pub id: String,

    /// API key for integrations that need one
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Args)]
pub struct IntegrationIdArgs {
    /// Integration id
    pub id: String,
}

pub async fn execute(cmd: IntegrationCommands, project_dir: &Path) -> Result<()> {
    let workbench = Workbench::open(project_dir).await?;
    let timing = &workbench.config.timing;
    let mut hub = IntegrationHub::new(timing.connect(), timing.sync());

    match cmd {
        IntegrationCommands::List => {
            output::print_integrations(hub.integrations());
            let counts = hub.status_counts();
            println!();
            println!(
                "{} connected, {} disconnected, {} error ({} total)",
                counts.connected.to_string().green(),
                counts.disconnected,
                counts.error.to_string().red(),
                counts.total
            );
        }

        IntegrationCommands::Connect(args) => {
            let name = hub.get(&args.id)?.name.clone();
            let connecting = spinner(&format!("Connecting {}...", name));
            let outcome = hub.connect(&args.id).await;
            connecting.finish_and_clear();

            if outcome? == ConnectOutcome::ApiKeyRequired {
                let api_key = match args.api_key {
                    Some(key) => key,
                    None => Input::new()
                        .with_prompt(format!("{} API key", name))
                        .interact_text()
                        .context("Failed to read API key")?,
                };
                hub.configure(
                    &args.id,
                    IntegrationConfig {
                        api_key: Some(api_key),
                        ..Default::default()
                    },
                )?;
            }

            println!("{} Connected {}", "✓".green().bold(), name.cyan());
        }

        IntegrationCommands::Sync(args) => {
            let name = hub.get(&args.id)?.name.clone();
            let syncing = spinner(&format!("Syncing {}...", name));
            let status = hub.sync(&args.id).await;
            syncing.finish_and_clear();
            println!("{} {} is {}", "✓".green().bold(), name.cyan(), status?);
        }

        IntegrationCommands::Disconnect(args) => {
            hub.disconnect(&args.id)?;
            println!(
                "{} Disconnected {}",
                "✓".green().bold(),
                hub.get(&args.id)?.name.cyan()
            );
        }
    }

    Ok(())
}
