//! Monthly happiness pulse.
//!
//! Each user answers once per month with a score from 1 to 5 and an
//! optional suggestion. Submissions are appended to the store's history.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::info;

use crate::analytics::Trend;
use crate::error::{WorkbenchError, WorkbenchResult};
use crate::model::HappinessPulse;
use crate::store::AppStore;

/// User id used when nobody more specific is signed in.
pub const CURRENT_USER: &str = "current-user";

/// Month the trend is measured against.
pub const BASELINE_MONTH: &str = "2024-01";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HappinessLevel {
    pub value: u8,
    pub label: &'static str,
    pub color: &'static str,
}

pub const LEVELS: [HappinessLevel; 5] = [
    HappinessLevel { value: 1, label: "Very Unhappy", color: "#ef4444" },
    HappinessLevel { value: 2, label: "Unhappy", color: "#f97316" },
    HappinessLevel { value: 3, label: "Neutral", color: "#eab308" },
    HappinessLevel { value: 4, label: "Happy", color: "#22c55e" },
    HappinessLevel { value: 5, label: "Very Happy", color: "#10b981" },
];

pub fn level(score: u8) -> Option<&'static HappinessLevel> {
    LEVELS.iter().find(|l| l.value == score)
}

/// `YYYY-MM` for a timestamp.
pub fn month_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

pub fn has_submitted(pulses: &[HappinessPulse], user_id: &str, month: &str) -> bool {
    pulses
        .iter()
        .any(|p| p.user_id == user_id && p.month == month)
}

/// Record a pulse for `user_id` in the month of `now`.
pub async fn submit(
    store: &AppStore,
    user_id: &str,
    score: u8,
    suggestion: &str,
    now: DateTime<Utc>,
) -> WorkbenchResult<HappinessPulse> {
    if level(score).is_none() {
        return Err(WorkbenchError::InvalidScore(score));
    }

    let month = month_key(now);
    if has_submitted(&store.happiness_pulse(), user_id, &month) {
        return Err(WorkbenchError::PulseAlreadySubmitted {
            user_id: user_id.to_string(),
            month,
        });
    }

    let pulse = HappinessPulse {
        user_id: user_id.to_string(),
        score,
        suggestion: suggestion.trim().to_string(),
        month,
        year: now.year(),
    };
    store.add_happiness_pulse(pulse.clone()).await?;
    info!(user_id = %pulse.user_id, month = %pulse.month, score, "Happiness pulse submitted");
    Ok(pulse)
}

/// Six answers from the first two months of 2024.
pub fn sample_history() -> Vec<HappinessPulse> {
    let entry = |user: &str, score: u8, suggestion: &str, month: &str| HappinessPulse {
        user_id: user.to_string(),
        score,
        suggestion: suggestion.to_string(),
        month: month.to_string(),
        year: 2024,
    };
    vec![
        entry("user1", 4, "More flexible work hours", "2024-01"),
        entry("user2", 3, "Better project planning", "2024-01"),
        entry("user3", 5, "Keep up the great work!", "2024-01"),
        entry("user1", 4, "Team building activities", "2024-02"),
        entry("user2", 4, "More recognition for achievements", "2024-02"),
        entry("user3", 4, "Clearer communication", "2024-02"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionCount {
    pub suggestion: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseSummary {
    pub responses: usize,
    pub average: f64,
    pub baseline_average: f64,
    pub trend: Trend,
    /// Count per score, index 0 is score 1.
    pub distribution: [usize; 5],
    pub top_suggestions: Vec<SuggestionCount>,
}

/// Mean score, optionally for one month. Zero when there is no data.
pub fn average_score(pulses: &[HappinessPulse], month: Option<&str>) -> f64 {
    let scores: Vec<f64> = pulses
        .iter()
        .filter(|p| month.map_or(true, |m| p.month == m))
        .map(|p| p.score as f64)
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

pub fn summarize(pulses: &[HappinessPulse], baseline_month: &str) -> PulseSummary {
    let average = average_score(pulses, None);
    let baseline_average = average_score(pulses, Some(baseline_month));
    let trend = if average > baseline_average {
        Trend::Up
    } else if average < baseline_average {
        Trend::Down
    } else {
        Trend::Stable
    };

    let mut distribution = [0usize; 5];
    for pulse in pulses {
        if (1..=5).contains(&pulse.score) {
            distribution[(pulse.score - 1) as usize] += 1;
        }
    }

    // First-seen order breaks ties.
    let mut counts: Vec<SuggestionCount> = Vec::new();
    for suggestion in pulses.iter().map(|p| p.suggestion.as_str()).filter(|s| !s.is_empty()) {
        match counts.iter_mut().find(|c| c.suggestion == suggestion) {
            Some(entry) => entry.count += 1,
            None => counts.push(SuggestionCount {
                suggestion: suggestion.to_string(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(5);

    PulseSummary {
        responses: pulses.len(),
        average,
        baseline_average,
        trend,
        distribution,
        top_suggestions: counts,
    }
}

/// Summary over the sample history plus everything submitted so far.
pub fn team_summary(store: &AppStore) -> PulseSummary {
    let mut pulses = sample_history();
    pulses.extend(store.happiness_pulse());
    summarize(&pulses, BASELINE_MONTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn march() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_submit_marks_month_submitted() {
        let store = AppStore::in_memory();
        let pulse = submit(&store, CURRENT_USER, 4, "  More demos ", march())
            .await
            .unwrap();
        assert_eq!(pulse.month, "2024-03");
        assert_eq!(pulse.year, 2024);
        assert_eq!(pulse.suggestion, "More demos");
        assert!(has_submitted(&store.happiness_pulse(), CURRENT_USER, "2024-03"));
        assert!(!has_submitted(&store.happiness_pulse(), "someone-else", "2024-03"));
    }

    #[tokio::test]
    async fn test_second_submission_same_month_rejected() {
        let store = AppStore::in_memory();
        submit(&store, CURRENT_USER, 4, "", march()).await.unwrap();
        let err = submit(&store, CURRENT_USER, 2, "", march()).await.unwrap_err();
        assert!(matches!(err, WorkbenchError::PulseAlreadySubmitted { .. }));
        assert_eq!(store.happiness_pulse().len(), 1);

        let april = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        submit(&store, CURRENT_USER, 5, "", april).await.unwrap();
        assert_eq!(store.happiness_pulse().len(), 2);
    }

    #[tokio::test]
    async fn test_score_out_of_range() {
        let store = AppStore::in_memory();
        assert!(matches!(
            submit(&store, CURRENT_USER, 0, "", march()).await,
            Err(WorkbenchError::InvalidScore(0))
        ));
        assert!(submit(&store, CURRENT_USER, 6, "", march()).await.is_err());
    }

    #[test]
    fn test_sample_summary() {
        let summary = summarize(&sample_history(), BASELINE_MONTH);
        assert_eq!(summary.responses, 6);
        assert!((summary.average - 4.0).abs() < f64::EPSILON);
        assert!((summary.baseline_average - 4.0).abs() < f64::EPSILON);
        assert_eq!(summary.trend, Trend::Stable);
        assert_eq!(summary.distribution, [0, 0, 1, 4, 1]);
        assert_eq!(summary.top_suggestions.len(), 5);
        assert_eq!(summary.top_suggestions[0].suggestion, "More flexible work hours");
    }

    #[test]
    fn test_top_suggestions_ranked_by_count() {
        let mut pulses = sample_history();
        for user in ["a", "b"] {
            pulses.push(HappinessPulse {
                user_id: user.into(),
                score: 5,
                suggestion: "Clearer communication".into(),
                month: "2024-03".into(),
                year: 2024,
            });
        }
        let summary = summarize(&pulses, BASELINE_MONTH);
        assert_eq!(summary.top_suggestions[0].suggestion, "Clearer communication");
        assert_eq!(summary.top_suggestions[0].count, 3);
        assert_eq!(summary.trend, Trend::Up);
    }

    #[test]
    fn test_empty_history() {
        let summary = summarize(&[], BASELINE_MONTH);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.trend, Trend::Stable);
        assert!(summary.top_suggestions.is_empty());
    }
}
