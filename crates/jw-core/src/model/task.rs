//! Task domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WorkbenchError;

/// A kanban task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub ai_recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner given to tasks created without one.
pub const UNASSIGNED: &str = "Unassigned";

impl Task {
    /// Create a task with a fresh id and no owner.
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            status,
            owner: UNASSIGNED.to_string(),
            due_date: None,
            subtasks: Vec::new(),
            files: Vec::new(),
            ai_recommendations: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update into this task.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
        if let Some(due) = patch.due_date {
            self.due_date = if due.trim().is_empty() { None } else { Some(due) };
        }
        if let Some(subtasks) = patch.subtasks {
            self.subtasks = subtasks;
        }
        if let Some(files) = patch.files {
            self.files = files;
        }
        if let Some(recs) = patch.ai_recommendations {
            self.ai_recommendations = recs;
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = updated_at;
        }
    }

    /// (filled, total) subtask counts. A subtask counts as filled once it
    /// has any text.
    pub fn subtask_progress(&self) -> (usize, usize) {
        let filled = self.subtasks.iter().filter(|s| !s.is_empty()).count();
        (filled, self.subtasks.len())
    }
}

/// Partial task update. An empty `due_date` clears the due date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub owner: Option<String>,
    pub due_date: Option<String>,
    pub subtasks: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
    pub ai_recommendations: Option<Vec<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            updated_at: Some(Utc::now()),
            ..Default::default()
        }
    }
}

/// Task status (kanban lane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    ParkingLot,
    ToDo,
    Doing,
    Done,
}

impl TaskStatus {
    /// All lanes in board order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::ParkingLot,
        TaskStatus::ToDo,
        TaskStatus::Doing,
        TaskStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParkingLot => "parking-lot",
            Self::ToDo => "to-do",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ParkingLot => "Parking Lot",
            Self::ToDo => "To-Do",
            Self::Doing => "Doing",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = WorkbenchError;

    /// Accepts the kebab-case lane ids plus underscore and squashed spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "parking-lot" | "parkinglot" | "parking" => Ok(Self::ParkingLot),
            "to-do" | "todo" => Ok(Self::ToDo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(WorkbenchError::UnknownStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("parking-lot".parse::<TaskStatus>().unwrap(), TaskStatus::ParkingLot);
        assert_eq!("TODO".parse::<TaskStatus>().unwrap(), TaskStatus::ToDo);
        assert_eq!("parking_lot".parse::<TaskStatus>().unwrap(), TaskStatus::ParkingLot);
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!(matches!(
            "review".parse::<TaskStatus>(),
            Err(WorkbenchError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_status_wire_names_match_as_str() {
        for status in TaskStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_patch_clears_due_date() {
        let mut task = Task::new("Review renewals", TaskStatus::ToDo);
        task.apply(TaskPatch {
            due_date: Some("2024-01-20".into()),
            ..Default::default()
        });
        assert_eq!(task.due_date.as_deref(), Some("2024-01-20"));
        task.apply(TaskPatch {
            due_date: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_subtask_progress_counts_filled() {
        let mut task = Task::new("t", TaskStatus::ParkingLot);
        assert_eq!(task.subtask_progress(), (0, 0));
        task.subtasks = vec!["Pull data".into(), String::new(), "Score".into()];
        assert_eq!(task.subtask_progress(), (2, 3));
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Quick add", TaskStatus::ParkingLot);
        assert_eq!(task.owner, UNASSIGNED);
        assert!(task.description.is_empty());
        assert_eq!(task.created_at, task.updated_at);
    }
}
