//! Kanban board logic.
//!
//! Four fixed lanes over the store's task list. Lane moves go through
//! [`AppStore::move_task`] so that reaching done still celebrates.

use serde::Serialize;
use tracing::{error, info};

use crate::ai::{parse_list, TextGenerator, TextRequest};
use crate::error::{WorkbenchError, WorkbenchResult};
use crate::model::{OnboardingData, Task, TaskPatch, TaskStatus};
use crate::store::AppStore;

/// Most suggestions kept from one AI reply.
pub const MAX_SUGGESTIONS: usize = 5;

/// Display settings for a lane.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Lane {
    pub status: TaskStatus,
    pub title: &'static str,
    pub color: &'static str,
}

pub const LANES: [Lane; 4] = [
    Lane {
        status: TaskStatus::ParkingLot,
        title: "Parking Lot",
        color: "#6b7280",
    },
    Lane {
        status: TaskStatus::ToDo,
        title: "To-Do",
        color: "#3b82f6",
    },
    Lane {
        status: TaskStatus::Doing,
        title: "Doing",
        color: "#FF9642",
    },
    Lane {
        status: TaskStatus::Done,
        title: "Done",
        color: "#10b981",
    },
];

/// One lane with its tasks.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub status: TaskStatus,
    pub title: String,
    pub color: String,
    pub count: usize,
    pub tasks: Vec<Task>,
}

/// Tasks grouped by lane, in lane order.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
    pub total: usize,
}

impl Board {
    pub fn column(&self, status: TaskStatus) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.column(status).map(|c| c.count).unwrap_or(0)
    }
}

/// Group tasks per lane, keeping list order inside each lane.
pub fn build_board(tasks: &[Task]) -> Board {
    let columns = LANES
        .iter()
        .map(|lane| {
            let lane_tasks: Vec<Task> = tasks
                .iter()
                .filter(|t| t.status == lane.status)
                .cloned()
                .collect();
            Column {
                status: lane.status,
                title: lane.title.to_string(),
                color: lane.color.to_string(),
                count: lane_tasks.len(),
                tasks: lane_tasks,
            }
        })
        .collect();

    Board {
        columns,
        total: tasks.len(),
    }
}

/// Three tasks that fill an empty board.
pub fn sample_tasks() -> Vec<Task> {
    let mut review = Task::new("Review Q4 renewal pipeline", TaskStatus::ToDo);
    review.description = "Analyze upcoming renewals and identify at-risk accounts".into();
    review.owner = "Sarah Chen".into();
    review.due_date = Some("2024-01-20".into());
    review.subtasks = vec![
        "Pull renewal data".into(),
        "Score account health".into(),
        "Create action plan".into(),
    ];
    review.ai_recommendations = vec![
        "Focus on accounts with declining usage".into(),
        "Schedule check-ins with key stakeholders".into(),
    ];

    let mut health = Task::new("Update customer health scores", TaskStatus::Doing);
    health.description = "Refresh health scoring model with latest data".into();
    health.owner = "Emma Thompson".into();
    health.due_date = Some("2024-01-18".into());
    health.subtasks = vec![
        "Gather usage metrics".into(),
        "Update scoring algorithm".into(),
    ];
    health.ai_recommendations = vec!["Include support ticket volume in scoring".into()];

    let mut materials = Task::new("Prepare onboarding materials", TaskStatus::Done);
    materials.description = "Create updated onboarding deck for new customers".into();
    materials.owner = "Mike Rodriguez".into();
    materials.subtasks = vec![
        "Design slides".into(),
        "Record demo videos".into(),
        "Test with pilot customer".into(),
    ];

    vec![review, health, materials]
}

/// Fill the board with sample tasks if it is empty. Returns whether it did.
pub async fn seed_if_empty(store: &AppStore) -> WorkbenchResult<bool> {
    if !store.tasks().is_empty() {
        return Ok(false);
    }
    store.set_tasks(sample_tasks()).await?;
    info!("Seeded board with sample tasks");
    Ok(true)
}

/// Quick-add a task by title. Lands in the parking lot unless a lane is given.
pub async fn quick_add(
    store: &AppStore,
    title: &str,
    status: Option<TaskStatus>,
) -> WorkbenchResult<Task> {
    let title = title.trim();
    if title.is_empty() {
        return Err(WorkbenchError::validation("Task title cannot be empty"));
    }

    let task = Task::new(title, status.unwrap_or(TaskStatus::ParkingLot));
    store.add_task(task.clone()).await?;
    info!(task_id = %task.id, status = %task.status, "Task added");
    Ok(task)
}

/// Move a task by id to another lane.
pub async fn move_task(store: &AppStore, id: &str, status: TaskStatus) -> WorkbenchResult<Task> {
    if !store.move_task(id, status).await? {
        return Err(WorkbenchError::TaskNotFound(id.to_string()));
    }
    store
        .task(id)
        .ok_or_else(|| WorkbenchError::TaskNotFound(id.to_string()))
}

/// Fields editable from the task detail dialog.
#[derive(Debug, Clone, Default)]
pub struct TaskDetails {
    pub description: Option<String>,
    pub owner: Option<String>,
    /// Empty string clears the due date.
    pub due_date: Option<String>,
}

pub async fn edit_task(store: &AppStore, id: &str, details: TaskDetails) -> WorkbenchResult<Task> {
    let patch = TaskPatch {
        description: details.description,
        owner: details.owner,
        due_date: details.due_date,
        ..Default::default()
    };
    update_existing(store, id, patch).await
}

/// Append an empty subtask.
pub async fn add_subtask(store: &AppStore, id: &str) -> WorkbenchResult<Task> {
    let mut subtasks = existing(store, id)?.subtasks;
    subtasks.push(String::new());
    update_existing(store, id, subtasks_patch(subtasks)).await
}

pub async fn set_subtask(
    store: &AppStore,
    id: &str,
    index: usize,
    text: &str,
) -> WorkbenchResult<Task> {
    let mut subtasks = existing(store, id)?.subtasks;
    let slot = subtasks
        .get_mut(index)
        .ok_or_else(|| WorkbenchError::validation(format!("No subtask at index {}", index)))?;
    *slot = text.to_string();
    update_existing(store, id, subtasks_patch(subtasks)).await
}

pub async fn remove_subtask(store: &AppStore, id: &str, index: usize) -> WorkbenchResult<Task> {
    let mut subtasks = existing(store, id)?.subtasks;
    if index >= subtasks.len() {
        return Err(WorkbenchError::validation(format!(
            "No subtask at index {}",
            index
        )));
    }
    subtasks.remove(index);
    update_existing(store, id, subtasks_patch(subtasks)).await
}

fn subtasks_patch(subtasks: Vec<String>) -> TaskPatch {
    TaskPatch {
        subtasks: Some(subtasks),
        ..Default::default()
    }
}

fn existing(store: &AppStore, id: &str) -> WorkbenchResult<Task> {
    store
        .task(id)
        .ok_or_else(|| WorkbenchError::TaskNotFound(id.to_string()))
}

async fn update_existing(store: &AppStore, id: &str, patch: TaskPatch) -> WorkbenchResult<Task> {
    if !store.update_task(id, patch).await? {
        return Err(WorkbenchError::TaskNotFound(id.to_string()));
    }
    existing(store, id)
}

/// Prompt asking for new backlog items.
pub fn suggestions_prompt(data: &OnboardingData, tasks: &[Task]) -> String {
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    format!(
        "Based on this Customer Success team's context, suggest 3-5 new backlog items:\n\n\
         Company: {}\n\
         Goals: {}\n\
         Pain Points: {}\n\
         Current Tasks: {}\n\n\
         Generate practical, actionable task suggestions that would help achieve their goals. Format as a simple list with just the task titles.",
        data.company_description,
        data.quarterly_goals.join(", "),
        data.pain_points.join(", "),
        titles.join(", "),
    )
}

/// AI suggestion tray shown above the board.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionTray {
    items: Vec<String>,
    is_generating: bool,
}

impl SuggestionTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// Ask the AI for suggestions. On failure the error is logged and the
    /// tray keeps what it had.
    pub async fn generate(&mut self, store: &AppStore, ai: &dyn TextGenerator) -> &[String] {
        self.is_generating = true;
        let prompt = suggestions_prompt(&store.onboarding(), &store.tasks());
        match ai.generate_text(TextRequest::new(prompt, 200)).await {
            Ok(response) => {
                self.items = parse_list(&response.text, MAX_SUGGESTIONS);
                info!(count = self.items.len(), "Generated suggestions");
            }
            Err(e) => error!(error = %e, "Error generating suggestions"),
        }
        self.is_generating = false;
        &self.items
    }

    /// Add a suggestion to the parking lot and take it off the tray.
    pub async fn accept(&mut self, store: &AppStore, suggestion: &str) -> WorkbenchResult<Task> {
        let task = quick_add(store, suggestion, Some(TaskStatus::ParkingLot)).await?;
        self.items.retain(|s| s != suggestion);
        Ok(task)
    }

    pub fn dismiss(&mut self, suggestion: &str) {
        self.items.retain(|s| s != suggestion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ScriptedTextGenerator;

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let store = AppStore::in_memory();
        assert!(seed_if_empty(&store).await.unwrap());
        assert_eq!(store.tasks().len(), 3);
        assert!(!seed_if_empty(&store).await.unwrap());
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn test_board_groups_by_lane() {
        let board = build_board(&sample_tasks());
        assert_eq!(board.total, 3);
        assert_eq!(board.columns.len(), 4);
        assert_eq!(board.count(TaskStatus::ParkingLot), 0);
        assert_eq!(board.count(TaskStatus::ToDo), 1);
        assert_eq!(board.count(TaskStatus::Doing), 1);
        assert_eq!(board.count(TaskStatus::Done), 1);
        assert_eq!(board.columns[2].title, "Doing");
    }

    #[tokio::test]
    async fn test_quick_add_defaults() {
        let store = AppStore::in_memory();
        let task = quick_add(&store, "  Call Acme  ", None).await.unwrap();
        assert_eq!(task.title, "Call Acme");
        assert_eq!(task.owner, "Unassigned");
        assert_eq!(task.status, TaskStatus::ParkingLot);
        assert!(quick_add(&store, " ", None).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_unknown_task_errors() {
        let store = AppStore::in_memory();
        assert!(matches!(
            move_task(&store, "ghost", TaskStatus::Done).await,
            Err(WorkbenchError::TaskNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_subtask_editing_and_progress() {
        let store = AppStore::in_memory();
        let task = quick_add(&store, "QBR prep", None).await.unwrap();

        add_subtask(&store, &task.id).await.unwrap();
        add_subtask(&store, &task.id).await.unwrap();
        let updated = set_subtask(&store, &task.id, 0, "Draft deck").await.unwrap();
        assert_eq!(updated.subtask_progress(), (1, 2));

        let updated = remove_subtask(&store, &task.id, 1).await.unwrap();
        assert_eq!(updated.subtasks, vec!["Draft deck"]);
        assert!(set_subtask(&store, &task.id, 5, "x").await.is_err());
    }

    #[tokio::test]
    async fn test_edit_clears_due_date() {
        let store = AppStore::in_memory();
        let task = quick_add(&store, "Renewals", None).await.unwrap();
        edit_task(
            &store,
            &task.id,
            TaskDetails {
                owner: Some("Emma Thompson".into()),
                due_date: Some("2024-02-01".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let cleared = edit_task(
            &store,
            &task.id,
            TaskDetails {
                due_date: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.owner, "Emma Thompson");
        assert!(cleared.due_date.is_none());
    }

    #[tokio::test]
    async fn test_suggestions_parse_and_accept() {
        let store = AppStore::in_memory();
        seed_if_empty(&store).await.unwrap();
        let ai = ScriptedTextGenerator::replying(
            "- Build churn playbook\n• Automate QBR decks\n\n* Map stakeholders\n- A\n- B\n- C",
        );

        let mut tray = SuggestionTray::new();
        let items = tray.generate(&store, &ai).await.to_vec();
        assert_eq!(items.len(), MAX_SUGGESTIONS);
        assert_eq!(items[1], "Automate QBR decks");

        let request = &ai.requests()[0];
        assert_eq!(request.max_tokens, 200);
        assert!(request.prompt.contains("Review Q4 renewal pipeline"));

        let task = tray.accept(&store, "Automate QBR decks").await.unwrap();
        assert_eq!(task.status, TaskStatus::ParkingLot);
        assert_eq!(tray.items().len(), MAX_SUGGESTIONS - 1);
        assert_eq!(store.tasks().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_suggestions_keep_tray() {
        let store = AppStore::in_memory();
        let ai = ScriptedTextGenerator::sequence(vec![Ok("- One".into()), Err("down".into())]);
        let mut tray = SuggestionTray::new();
        tray.generate(&store, &ai).await;
        tray.generate(&store, &ai).await;
        assert_eq!(tray.items().to_vec(), vec!["One"]);
        assert!(!tray.is_generating());
    }
}
