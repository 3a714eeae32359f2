//! AI agents.
//!
//! An agent is a named prompt template. Assigning work wraps the
//! description in the agent's template and sends it to the text endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

use crate::ai::{TextGenerator, TextRequest};
use crate::error::{WorkbenchError, WorkbenchResult};

/// Characters of the description kept in a task title.
pub const TITLE_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    DataScout,
    ExperimentRunner,
    RetroScribe,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [
        AgentKind::DataScout,
        AgentKind::ExperimentRunner,
        AgentKind::RetroScribe,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::DataScout => "data-scout",
            Self::ExperimentRunner => "experiment-runner",
            Self::RetroScribe => "retro-scribe",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DataScout => "Data Scout",
            Self::ExperimentRunner => "Experiment Runner",
            Self::RetroScribe => "Retro Scribe",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::DataScout => "Fetches and plots metrics from your connected systems",
            Self::ExperimentRunner => "Designs A/B tests, predicts lift, and returns execution plans",
            Self::RetroScribe => "Summarizes sprint learnings and generates actionable insights",
        }
    }

    pub fn capabilities(&self) -> [&'static str; 4] {
        match self {
            Self::DataScout => [
                "Pull KPIs from Salesforce, HubSpot, and other systems",
                "Generate charts and visualizations",
                "Identify trends and anomalies",
                "Create automated reports",
            ],
            Self::ExperimentRunner => [
                "Design A/B test frameworks",
                "Calculate statistical significance",
                "Predict expected lift and impact",
                "Generate implementation roadmaps",
            ],
            Self::RetroScribe => [
                "Analyze sprint performance",
                "Extract key learnings and blockers",
                "Generate retrospective summaries",
                "Suggest process improvements",
            ],
        }
    }

    /// Wrap a request in this agent's template.
    pub fn prompt(&self, request: &str) -> String {
        match self {
            Self::DataScout => format!(
                "As a Data Scout agent, analyze this request and provide insights: \"{}\". Focus on data analysis, metrics, and actionable insights.",
                request
            ),
            Self::ExperimentRunner => format!(
                "As an Experiment Runner agent, design an A/B test for: \"{}\". Include hypothesis, test design, success metrics, and expected outcomes.",
                request
            ),
            Self::RetroScribe => format!(
                "As a Retro Scribe agent, analyze and summarize: \"{}\". Focus on learnings, patterns, and improvement recommendations.",
                request
            ),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AgentKind {
    type Err = WorkbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| WorkbenchError::AgentNotFound(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentTaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTask {
    pub id: String,
    pub agent_id: AgentKind,
    pub title: String,
    pub description: String,
    pub status: AgentTaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// First [`TITLE_LIMIT`] characters, with `...` when cut.
pub fn task_title(description: &str) -> String {
    if description.chars().count() > TITLE_LIMIT {
        let head: String = description.chars().take(TITLE_LIMIT).collect();
        format!("{}...", head)
    } else {
        description.to_string()
    }
}

/// Agent task history for the session.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDesk {
    tasks: Vec<AgentTask>,
    is_running: bool,
}

impl AgentDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[AgentTask] {
        &self.tasks
    }

    pub fn tasks_for(&self, agent: AgentKind) -> impl Iterator<Item = &AgentTask> {
        self.tasks.iter().filter(move |t| t.agent_id == agent)
    }

    /// Run `description` through `agent`. The task is recorded as running,
    /// then completed with the reply or marked failed.
    pub async fn assign(
        &mut self,
        agent: AgentKind,
        description: &str,
        ai: &dyn TextGenerator,
    ) -> WorkbenchResult<AgentTask> {
        if description.trim().is_empty() {
            return Err(WorkbenchError::validation("Describe the task for the agent"));
        }

        let task = AgentTask {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent,
            title: task_title(description),
            description: description.to_string(),
            status: AgentTaskStatus::Running,
            result: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        let index = self.tasks.len();
        self.tasks.push(task);
        self.is_running = true;
        info!(agent = %agent, "Agent task started");

        let outcome = ai
            .generate_text(TextRequest::new(agent.prompt(description), 500))
            .await;

        let task = &mut self.tasks[index];
        match outcome {
            Ok(response) => {
                task.status = AgentTaskStatus::Completed;
                task.result = Some(response.text);
                task.completed_at = Some(Utc::now());
                info!(agent = %agent, task_id = %task.id, "Agent task completed");
            }
            Err(e) => {
                task.status = AgentTaskStatus::Failed;
                error!(agent = %agent, error = %e, "Agent task failed");
            }
        }
        self.is_running = false;
        Ok(task.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ScriptedTextGenerator;

    #[test]
    fn test_title_truncation() {
        let long = "a".repeat(60);
        let title = task_title(&long);
        assert_eq!(title.len(), 53);
        assert!(title.ends_with("..."));
        assert_eq!(task_title("Short one"), "Short one");
        assert_eq!(task_title(&"b".repeat(50)), "b".repeat(50));
    }

    #[test]
    fn test_prompt_templates() {
        let prompt = AgentKind::ExperimentRunner.prompt("onboarding emails");
        assert!(prompt.starts_with("As an Experiment Runner agent"));
        assert!(prompt.contains("\"onboarding emails\""));
        assert_eq!("retro-scribe".parse::<AgentKind>().unwrap(), AgentKind::RetroScribe);
        assert!("oracle".parse::<AgentKind>().is_err());
    }

    #[tokio::test]
    async fn test_assign_completes_with_result() {
        let ai = ScriptedTextGenerator::replying("NDR is trending up.");
        let mut desk = AgentDesk::new();
        let task = desk
            .assign(AgentKind::DataScout, "Why is NDR moving?", &ai)
            .await
            .unwrap();

        assert_eq!(task.status, AgentTaskStatus::Completed);
        assert_eq!(task.result.as_deref(), Some("NDR is trending up."));
        assert!(task.completed_at.is_some());
        assert_eq!(ai.requests()[0].max_tokens, 500);
        assert_eq!(desk.tasks_for(AgentKind::DataScout).count(), 1);
    }

    #[tokio::test]
    async fn test_assign_marks_failure() {
        let ai = ScriptedTextGenerator::failing("timeout");
        let mut desk = AgentDesk::new();
        let task = desk
            .assign(AgentKind::RetroScribe, "Sprint 12", &ai)
            .await
            .unwrap();
        assert_eq!(task.status, AgentTaskStatus::Failed);
        assert!(task.result.is_none());
        assert!(desk.assign(AgentKind::RetroScribe, "  ", &ai).await.is_err());
    }
}
