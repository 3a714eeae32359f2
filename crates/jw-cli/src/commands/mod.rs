//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use jw_core::ai::{HttpTextGenerator, TextGenerator};
use jw_core::config::WorkbenchConfig;
use jw_core::notifier::WebNotifier;
use jw_core::AppStore;

pub mod agents;
pub mod integrations;
pub mod kpi;
pub mod onboard;
pub mod pulse;
pub mod reset;
pub mod serve;
pub mod standup;
pub mod status;
pub mod task;
pub mod view;

/// Jungwell - Customer Success workbench
#[derive(Parser)]
#[command(name = "jw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve(serve::ServeArgs),

    /// Answer the AI Scrum Master's onboarding questions
    Onboard,

    /// Show where the workbench stands
    Status(status::StatusArgs),

    /// Switch the current view
    View(view::ViewArgs),

    /// Task management (Kanban)
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Run the daily stand-up
    Standup,

    /// Monthly happiness pulse
    #[command(subcommand)]
    Pulse(pulse::PulseCommands),

    /// Impact analytics KPIs
    Kpi(kpi::KpiArgs),

    /// Connect and sync external systems
    #[command(subcommand)]
    Integrations(integrations::IntegrationCommands),

    /// AI agents
    #[command(subcommand)]
    Agents(agents::AgentCommands),

    /// Clear all persisted workbench state
    Reset(reset::ResetArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let project_dir = match self.project {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to read current directory")?,
        };

        match self.command {
            Commands::Serve(args) => serve::execute(args, &project_dir).await,
            Commands::Onboard => onboard::execute(&project_dir).await,
            Commands::Status(args) => status::execute(args, &project_dir).await,
            Commands::View(args) => view::execute(args, &project_dir).await,
            Commands::Task(cmd) => task::execute(cmd, &project_dir).await,
            Commands::Standup => standup::execute(&project_dir).await,
            Commands::Pulse(cmd) => pulse::execute(cmd, &project_dir).await,
            Commands::Kpi(args) => kpi::execute(args, &project_dir).await,
            Commands::Integrations(cmd) => integrations::execute(cmd, &project_dir).await,
            Commands::Agents(cmd) => agents::execute(cmd, &project_dir).await,
            Commands::Reset(args) => reset::execute(args, &project_dir).await,
        }
    }
}

/// Everything a command needs: config, the hydrated store, the AI client
/// and a notifier for a running server.
pub struct Workbench {
    pub config: WorkbenchConfig,
    pub store: AppStore,
    pub ai: Arc<dyn TextGenerator>,
    pub notifier: WebNotifier,
}

impl Workbench {
    pub async fn open(project_dir: &Path) -> Result<Self> {
        let config = WorkbenchConfig::load(project_dir).context("Failed to load configuration")?;
        let store = AppStore::open(&config, project_dir)
            .await
            .context("Failed to open workbench storage")?;
        let ai: Arc<dyn TextGenerator> = Arc::new(HttpTextGenerator::new(&config.ai));
        // JW_WEB_URL wins over the configured server address.
        let notifier = match std::env::var("JW_WEB_URL") {
            Ok(url) => WebNotifier::with_url(&url),
            Err(_) => WebNotifier::with_url(&format!(
                "http://{}:{}",
                config.server.host, config.server.port
            )),
        };

        debug!(notifier = %notifier.base_url(), "Workbench opened");

        Ok(Self {
            config,
            store,
            ai,
            notifier,
        })
    }
}

/// Spinner shown while waiting on the AI endpoint or a simulated delay.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use jw_core::kanban;

    #[tokio::test]
    async fn test_workbench_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();

        let first = Workbench::open(dir.path()).await.unwrap();
        kanban::quick_add(&first.store, "Draft renewal plan", None)
            .await
            .unwrap();
        drop(first);

        let second = Workbench::open(dir.path()).await.unwrap();
        let tasks = second.store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Draft renewal plan");
        assert!(dir.path().join(".jungwell").join("storage").exists());
    }
}
