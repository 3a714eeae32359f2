//! Impact analytics: sample KPIs, a renewal chart and a period selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::WorkbenchError;

/// Progress at or above this percentage counts as on track.
pub const ON_TRACK_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// How a trend should be coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendTone {
    Good,
    Bad,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub id: String,
    pub name: String,
    pub current: f64,
    pub target: f64,
    pub unit: String,
    pub trend: Trend,
    pub change: f64,
    pub period: String,
}

impl Kpi {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: &str,
        name: &str,
        current: f64,
        target: f64,
        unit: &str,
        trend: Trend,
        change: f64,
        period: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            current,
            target,
            unit: unit.to_string(),
            trend,
            change,
            period: period.to_string(),
        }
    }

    /// current / target as a percentage.
    pub fn progress(&self) -> f64 {
        if self.target == 0.0 {
            return 0.0;
        }
        self.current / self.target * 100.0
    }

    /// Progress rounded for display.
    pub fn progress_percent(&self) -> i64 {
        self.progress().round() as i64
    }

    pub fn is_on_track(&self) -> bool {
        self.progress() >= ON_TRACK_THRESHOLD
    }

    /// Churn goes the wrong way when it rises.
    pub fn is_positive_metric(&self) -> bool {
        self.id != "churn"
    }

    pub fn tone(&self) -> TrendTone {
        match (self.trend, self.is_positive_metric()) {
            (Trend::Stable, _) => TrendTone::Neutral,
            (Trend::Up, true) | (Trend::Down, false) => TrendTone::Good,
            _ => TrendTone::Bad,
        }
    }

    pub fn display_current(&self) -> String {
        format_value(self.current, &self.unit)
    }

    pub fn display_target(&self) -> String {
        format_value(self.target, &self.unit)
    }

    /// Signed change with its comparison period, e.g. `+5.2% vs last quarter`.
    pub fn display_change(&self) -> String {
        let sign = if self.change > 0.0 { "+" } else { "" };
        format!("{}{}% {}", sign, self.change, self.period)
    }
}

/// Dollar values show as thousands; everything else as value plus unit.
pub fn format_value(value: f64, unit: &str) -> String {
    if unit == "$" {
        return format!("${:.0}K", value / 1000.0);
    }
    format!("{}{}", value, unit)
}

pub fn sample_kpis() -> Vec<Kpi> {
    vec![
        Kpi::new("ndr", "Net Dollar Retention", 118.0, 120.0, "%", Trend::Up, 5.2, "vs last quarter"),
        Kpi::new("renewal", "Renewal Rate", 94.0, 95.0, "%", Trend::Up, 2.1, "vs last quarter"),
        Kpi::new("csat", "Customer Satisfaction", 4.3, 4.5, "/5", Trend::Stable, 0.1, "vs last month"),
        Kpi::new("health", "Avg Health Score", 78.0, 85.0, "/100", Trend::Up, 3.5, "vs last month"),
        Kpi::new("expansion", "Expansion Revenue", 245000.0, 300000.0, "$", Trend::Up, 12.3, "vs last quarter"),
        Kpi::new("churn", "Churn Rate", 3.2, 2.5, "%", Trend::Down, -0.8, "vs last quarter"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: String,
    pub actual: f64,
    pub target: f64,
}

/// Renewal rate against target over the last four months.
pub fn sample_chart() -> Vec<ChartPoint> {
    [("Oct", 92.0), ("Nov", 93.0), ("Dec", 94.0), ("Jan", 94.0)]
        .into_iter()
        .map(|(month, actual)| ChartPoint {
            month: month.to_string(),
            actual,
            target: 95.0,
        })
        .collect()
}

/// Summary cards under the KPI grid.
pub const INSIGHTS: [(&str, &str); 3] = [
    (
        "Goals on Track",
        "Most metrics are performing well. Focus on health score and expansion revenue.",
    ),
    ("Biggest Win", "Strong upsell performance this quarter"),
    ("Team Impact", "Above average delivery rate"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1m")]
    OneMonth,
    #[default]
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::SixMonths => "6m",
            Self::OneYear => "1y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneMonth => "1 Month",
            Self::ThreeMonths => "3 Months",
            Self::SixMonths => "6 Months",
            Self::OneYear => "1 Year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = WorkbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| WorkbenchError::validation(format!("Unknown period: {}", s)))
    }
}

/// Analytics screen state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub period: Period,
    pub is_refreshing: bool,
    pub kpis: Vec<Kpi>,
    pub chart: Vec<ChartPoint>,
    #[serde(skip)]
    refresh_delay: Duration,
}

impl AnalyticsView {
    pub fn new(refresh_delay: Duration) -> Self {
        Self {
            period: Period::default(),
            is_refreshing: false,
            kpis: sample_kpis(),
            chart: sample_chart(),
            refresh_delay,
        }
    }

    pub fn select_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn kpi(&self, id: &str) -> Option<&Kpi> {
        self.kpis.iter().find(|k| k.id == id)
    }

    pub fn on_track_count(&self) -> usize {
        self.kpis.iter().filter(|k| k.is_on_track()).count()
    }

    /// Simulated data refresh. The sample values do not change.
    pub async fn refresh(&mut self) {
        self.is_refreshing = true;
        info!(period = %self.period, "Refreshing analytics");
        tokio::time::sleep(self.refresh_delay).await;
        self.is_refreshing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(id: &str) -> Kpi {
        sample_kpis().into_iter().find(|k| k.id == id).unwrap()
    }

    #[test]
    fn test_ndr_progress_rounds_to_98() {
        let ndr = kpi("ndr");
        assert_eq!(ndr.progress_percent(), 98);
        assert!(ndr.is_on_track());
    }

    #[test]
    fn test_value_formatting() {
        let expansion = kpi("expansion");
        assert_eq!(expansion.display_current(), "$245K");
        assert_eq!(expansion.display_target(), "$300K");
        assert_eq!(kpi("csat").display_current(), "4.3/5");
        assert_eq!(kpi("ndr").display_current(), "118%");
        assert_eq!(kpi("health").display_target(), "85/100");
    }

    #[test]
    fn test_on_track_threshold() {
        assert!(kpi("health").is_on_track());
        assert!(kpi("renewal").is_on_track());
        assert!(!kpi("expansion").is_on_track());
    }

    #[test]
    fn test_churn_falling_is_good() {
        assert_eq!(kpi("churn").tone(), TrendTone::Good);
        assert_eq!(kpi("ndr").tone(), TrendTone::Good);
        assert_eq!(kpi("csat").tone(), TrendTone::Neutral);
        assert_eq!(kpi("churn").display_change(), "-0.8% vs last quarter");
        assert_eq!(kpi("ndr").display_change(), "+5.2% vs last quarter");
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("6m".parse::<Period>().unwrap(), Period::SixMonths);
        assert_eq!(Period::default().label(), "3 Months");
        assert!("2w".parse::<Period>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_takes_configured_delay() {
        let mut view = AnalyticsView::new(Duration::from_millis(2000));
        let start = tokio::time::Instant::now();
        view.refresh().await;
        assert!(start.elapsed() >= Duration::from_millis(2000));
        assert!(!view.is_refreshing);
        assert_eq!(view.on_track_count(), 5);
    }
}
