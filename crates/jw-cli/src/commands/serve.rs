//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use jw_web::AppState;

use super::Workbench;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (defaults to the configured port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (defaults to the configured host)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a daily rolling file
    #[arg(long)]
    pub log: bool,

    /// Directory for log files
    #[arg(long, requires = "log")]
    pub log_dir: Option<PathBuf>,
}

/// Where `--log` writes.
pub fn log_dir(args: &ServeArgs) -> PathBuf {
    args.log_dir.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("jungwell")
            .join("logs")
    })
}

pub async fn execute(args: ServeArgs, project_dir: &Path) -> Result<()> {
    let workbench = Workbench::open(project_dir).await?;
    let host = args
        .host
        .clone()
        .unwrap_or_else(|| workbench.config.server.host.clone());
    let port = args.port.unwrap_or(workbench.config.server.port);

    println!();
    println!("  {} {}", "Jungwell".truecolor(255, 150, 66).bold(), "Web Server".bold());
    println!();
    println!("  {}  http://{}:{}", "Workbench".green(), host, port);
    println!("  {}        http://{}:{}/api", "API".green(), host, port);
    println!("  {}  ws://{}:{}/ws", "WebSocket".green(), host, port);
    if args.log {
        println!("  {}       {}", "Logs".green(), log_dir(&args).display());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let state = AppState::new(
        workbench.store,
        workbench.ai,
        workbench.config.timing.clone(),
    );
    jw_web::run_server(state, &host, port).await?;

    Ok(())
}
