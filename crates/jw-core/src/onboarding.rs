//! Onboarding chat.
//!
//! A fixed script of six questions. Each answer is logged and written into
//! the matching onboarding field; after a short "thinking" pause the next
//! question is asked, or the closing message unlocks the rest of the
//! workbench.

use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

use crate::ai::{parse_list, TextGenerator, TextRequest};
use crate::error::{WorkbenchError, WorkbenchResult};
use crate::model::onboarding::split_list;
use crate::model::{ChatMessage, MessageKind, OnboardingData, OnboardingPatch, Sender, Task, TaskStatus, View};
use crate::store::AppStore;

/// Which onboarding field a question fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OnboardingField {
    CompanyDescription,
    TeamSize,
    QuarterlyGoals,
    Systems,
    DocsLinks,
    PainPoints,
}

impl OnboardingField {
    /// Multi-value fields take comma-separated answers.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Self::QuarterlyGoals | Self::Systems | Self::DocsLinks | Self::PainPoints
        )
    }

    /// Patch that stores `answer` in this field.
    pub fn patch(&self, answer: &str) -> OnboardingPatch {
        let mut patch = OnboardingPatch::default();
        match self {
            Self::CompanyDescription => patch.company_description = Some(answer.to_string()),
            Self::TeamSize => patch.team_size = Some(answer.to_string()),
            Self::QuarterlyGoals => patch.quarterly_goals = Some(split_list(answer)),
            Self::Systems => patch.systems = Some(split_list(answer)),
            Self::DocsLinks => patch.docs_links = Some(split_list(answer)),
            Self::PainPoints => patch.pain_points = Some(split_list(answer)),
        }
        patch
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub field: OnboardingField,
}

pub const QUESTIONS: [Question; 6] = [
    Question {
        id: "company",
        prompt: "Hi there! 👋 I'm your AI Scrum Master. Let's get started! Tell me about your company in one sentence.",
        field: OnboardingField::CompanyDescription,
    },
    Question {
        id: "team",
        prompt: "Great! Now, what's your team size and what roles do you have?",
        field: OnboardingField::TeamSize,
    },
    Question {
        id: "goals",
        prompt: "What are your main Customer Success goals this quarter?",
        field: OnboardingField::QuarterlyGoals,
    },
    Question {
        id: "systems",
        prompt: "Which systems does your team currently use? (SFDC, HubSpot, Gainsight, Tableau, etc.)",
        field: OnboardingField::Systems,
    },
    Question {
        id: "docs",
        prompt: "Do you have any links to docs, playbooks, or roadmaps I should know about?",
        field: OnboardingField::DocsLinks,
    },
    Question {
        id: "pain",
        prompt: "What are your biggest pain points today?",
        field: OnboardingField::PainPoints,
    },
];

pub const COMPLETION_MESSAGE: &str = "Perfect! 🎉 I have everything I need. Ready for lift-off? I'll draft your first backlog and invite your crew to the workbench!";

/// What happened after an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OnboardingStep {
    /// Input was blank; nothing changed.
    Ignored,
    /// The next question was asked.
    Next { index: usize, question: String },
    /// The script is finished and onboarding is complete.
    Complete,
}

/// One pass through the onboarding chat.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSession {
    messages: Vec<ChatMessage>,
    question_index: usize,
    is_typing: bool,
    is_finished: bool,
    #[serde(skip)]
    thinking: Duration,
}

impl OnboardingSession {
    /// Start a session with the first question already asked.
    pub fn new(thinking: Duration) -> Self {
        Self {
            messages: vec![ChatMessage::from_ai(QUESTIONS[0].prompt)],
            question_index: 0,
            is_typing: false,
            is_finished: false,
            thinking,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn current_question(&self) -> &'static Question {
        &QUESTIONS[self.question_index]
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    /// "Step n of 6" label.
    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.question_index + 1, QUESTIONS.len())
    }

    /// Record an answer to the current question.
    pub async fn submit_answer(
        &mut self,
        store: &AppStore,
        input: &str,
    ) -> WorkbenchResult<OnboardingStep> {
        if self.is_finished {
            return Err(WorkbenchError::OnboardingComplete);
        }
        if input.trim().is_empty() {
            return Ok(OnboardingStep::Ignored);
        }

        self.messages.push(ChatMessage::from_user(input));
        let question = self.current_question();
        store.set_onboarding(question.field.patch(input)).await?;

        self.is_typing = true;
        tokio::time::sleep(self.thinking).await;
        self.is_typing = false;

        if self.question_index < QUESTIONS.len() - 1 {
            self.question_index += 1;
            let next = self.current_question();
            self.messages.push(ChatMessage::from_ai(next.prompt));
            Ok(OnboardingStep::Next {
                index: self.question_index,
                question: next.prompt.to_string(),
            })
        } else {
            self.messages
                .push(ChatMessage::new(Sender::Ai, COMPLETION_MESSAGE, MessageKind::System));
            self.is_finished = true;
            store
                .set_onboarding(OnboardingPatch {
                    is_complete: Some(true),
                    ..Default::default()
                })
                .await?;
            info!("Onboarding complete");
            Ok(OnboardingStep::Complete)
        }
    }
}

/// Prompt asking for the first backlog.
pub fn initial_backlog_prompt(data: &OnboardingData) -> String {
    format!(
        "Based on this Customer Success team's onboarding data, generate 5-7 initial backlog tasks:\n\n\
         Company: {}\n\
         Team Size: {}\n\
         Goals: {}\n\
         Systems: {}\n\
         Pain Points: {}\n\n\
         Generate practical, actionable tasks that would help them achieve their quarterly goals and address their pain points. Format as a simple list with task titles only.",
        data.company_description,
        data.team_size,
        data.quarterly_goals.join(", "),
        data.systems.join(", "),
        data.pain_points.join(", "),
    )
}

/// Open the dashboard and draft the first backlog.
///
/// Generated titles land in the parking lot. A failed AI call is logged and
/// leaves the backlog untouched.
pub async fn launch_workbench(
    store: &AppStore,
    ai: &dyn TextGenerator,
) -> WorkbenchResult<Vec<Task>> {
    store.set_current_view(View::Dashboard).await?;

    let prompt = initial_backlog_prompt(&store.onboarding());
    let text = match ai.generate_text(TextRequest::new(prompt, 300)).await {
        Ok(response) => response.text,
        Err(e) => {
            error!(error = %e, "Error generating initial tasks");
            return Ok(Vec::new());
        }
    };

    let mut created = Vec::new();
    for title in parse_list(&text, 7) {
        let task = Task::new(title, TaskStatus::ParkingLot);
        store.add_task(task.clone()).await?;
        created.push(task);
    }
    info!(count = created.len(), "Drafted initial backlog");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ScriptedTextGenerator;
    use crate::router::Screen;

    const ANSWERS: [&str; 6] = [
        "We help SaaS teams retain customers",
        "5 people: 2 CSMs, 1 analyst, 2 specialists",
        "NDR 120%, reduce churn",
        "Salesforce, Gainsight",
        "https://wiki.example.com/playbook",
        "Manual reporting, , no health scores",
    ];

    #[tokio::test]
    async fn test_full_script_completes_onboarding() {
        let store = AppStore::in_memory();
        let mut session = OnboardingSession::new(Duration::ZERO);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.progress_label(), "Step 1 of 6");

        for (i, answer) in ANSWERS.iter().enumerate() {
            let step = session.submit_answer(&store, answer).await.unwrap();
            if i < ANSWERS.len() - 1 {
                assert!(matches!(step, OnboardingStep::Next { index, .. } if index == i + 1));
                assert!(!store.onboarding().is_complete);
            } else {
                assert_eq!(step, OnboardingStep::Complete);
            }
        }

        let data = store.onboarding();
        assert!(data.is_complete);
        assert_eq!(data.company_description, ANSWERS[0]);
        assert_eq!(data.team_size, ANSWERS[1]);
        assert_eq!(data.quarterly_goals, vec!["NDR 120%", "reduce churn"]);
        assert_eq!(data.systems, vec!["Salesforce", "Gainsight"]);
        assert_eq!(data.pain_points, vec!["Manual reporting", "no health scores"]);

        // 1 opening + 6 answers + 5 follow-up questions + 1 completion.
        assert_eq!(session.messages().len(), 13);
        assert!(session.messages().last().unwrap().is_system());
        assert!(session.is_finished());
    }

    #[tokio::test]
    async fn test_blank_answer_is_ignored() {
        let store = AppStore::in_memory();
        let mut session = OnboardingSession::new(Duration::ZERO);
        let step = session.submit_answer(&store, "   ").await.unwrap();
        assert_eq!(step, OnboardingStep::Ignored);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.question_index(), 0);
    }

    #[tokio::test]
    async fn test_answers_after_completion_are_rejected() {
        let store = AppStore::in_memory();
        let mut session = OnboardingSession::new(Duration::ZERO);
        for answer in ANSWERS {
            session.submit_answer(&store, answer).await.unwrap();
        }
        assert!(matches!(
            session.submit_answer(&store, "more").await,
            Err(WorkbenchError::OnboardingComplete)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_thinking_delay_is_applied() {
        let store = AppStore::in_memory();
        let mut session = OnboardingSession::new(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();
        session.submit_answer(&store, "Acme").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_launch_creates_parking_lot_tasks() {
        let store = AppStore::in_memory();
        let mut session = OnboardingSession::new(Duration::ZERO);
        for answer in ANSWERS {
            session.submit_answer(&store, answer).await.unwrap();
        }

        let ai = ScriptedTextGenerator::replying("- Build health score\n- Audit renewals\n");
        let created = launch_workbench(&store, &ai).await.unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(store.screen(), Screen::Dashboard);
        assert!(store
            .tasks()
            .iter()
            .all(|t| t.status == TaskStatus::ParkingLot));
        let request = &ai.requests()[0];
        assert_eq!(request.max_tokens, 300);
        assert!(request.prompt.contains("Salesforce, Gainsight"));
    }

    #[tokio::test]
    async fn test_launch_survives_ai_failure() {
        let store = AppStore::in_memory();
        let ai = ScriptedTextGenerator::failing("offline");
        let created = launch_workbench(&store, &ai).await.unwrap();
        assert!(created.is_empty());
        assert_eq!(store.current_view(), View::Dashboard);
    }
}
