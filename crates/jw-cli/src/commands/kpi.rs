//! Impact analytics in the terminal.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use jw_core::analytics::{AnalyticsView, Period, INSIGHTS};

use super::{spinner, Workbench};
use crate::output;

#[derive(Args)]
pub struct KpiArgs {
    /// Reporting period (1m, 3m, 6m, 1y)
    #[arg(long, default_value = "3m")]
    pub period: String,

    /// Show a single KPI by id
    #[arg(long)]
    pub id: Option<String>,

    /// Simulate a data refresh first
    #[arg(long)]
    pub refresh: bool,
}

pub async fn execute(args: KpiArgs, project_dir: &Path) -> Result<()> {
    let workbench = Workbench::open(project_dir).await?;
    let period: Period = args.period.parse()?;

    let mut view = AnalyticsView::new(workbench.config.timing.refresh());
    view.select_period(period);

    if args.refresh {
        let refreshing = spinner("Refreshing...");
        view.refresh().await;
        refreshing.finish_and_clear();
    }

    if let Some(id) = args.id {
        match view.kpi(&id) {
            Some(kpi) => output::print_kpis(std::slice::from_ref(kpi)),
            None => anyhow::bail!("KPI not found: {}", id),
        }
        return Ok(());
    }

    println!("{} {}", "Impact Analytics".bold(), period.label().dimmed());
    println!();
    output::print_kpis(&view.kpis);
    println!();
    println!(
        "{} {} of {} KPIs on track",
        "✓".green().bold(),
        view.on_track_count(),
        view.kpis.len()
    );
    println!();
    println!("{}", "Insights".bold());
    for (title, body) in INSIGHTS {
        println!("  {} {}: {}", "✦".truecolor(255, 150, 66), title.bold(), body);
    }

    Ok(())
}
