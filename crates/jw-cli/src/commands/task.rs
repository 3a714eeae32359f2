//! Task management commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use jw_core::kanban::{self, SuggestionTray, TaskDetails};
use jw_core::model::{Task, TaskStatus};
use jw_core::AppStore;
use jw_store::WorkbenchEvent;

use super::{spinner, Workbench};
use crate::output;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Quick-add a task
    New(NewTaskArgs),

    /// Move a task to another lane
    Move(MoveTaskArgs),

    /// List tasks
    List(ListTaskArgs),

    /// Show one task
    Show(TaskIdArgs),

    /// Edit description, owner or due date
    Edit(EditTaskArgs),

    /// Append a subtask
    Subtask(SubtaskArgs),

    /// Remove a subtask by index
    DropSubtask(DropSubtaskArgs),

    /// Display the Kanban board
    Board,

    /// Load the sample board when there are no tasks
    Seed,

    /// Ask the AI for task suggestions
    Suggest(SuggestArgs),
}

#[derive(Args)]
pub struct NewTaskArgs {
    /// Task title
    pub title: String,

    /// Lane (parking-lot, to-do, doing, done)
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct MoveTaskArgs {
    /// Task ID or unique prefix
    pub task_id: String,

    /// Target lane (parking-lot, to-do, doing, done)
    pub status: String,
}

#[derive(Args)]
pub struct ListTaskArgs {
    /// Only this lane
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct TaskIdArgs {
    /// Task ID or unique prefix
    pub task_id: String,
}

#[derive(Args)]
pub struct EditTaskArgs {
    /// Task ID or unique prefix
    pub task_id: String,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub owner: Option<String>,

    /// Due date (YYYY-MM-DD); an empty value clears it
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct SubtaskArgs {
    /// Task ID or unique prefix
    pub task_id: String,

    /// Subtask text
    pub text: String,
}

#[derive(Args)]
pub struct DropSubtaskArgs {
    /// Task ID or unique prefix
    pub task_id: String,

    /// Zero-based subtask index
    pub index: usize,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Add every suggestion to the parking lot
    #[arg(long)]
    pub accept_all: bool,
}

/// Find a task by full id or unique id prefix.
pub fn resolve_task(store: &AppStore, id: &str) -> Result<Task> {
    if let Some(task) = store.task(id) {
        return Ok(task);
    }
    let mut matches: Vec<Task> = store
        .tasks()
        .into_iter()
        .filter(|t| t.id.starts_with(id))
        .collect();
    match matches.len() {
        0 => bail!("Task not found: {}", id),
        1 => Ok(matches.remove(0)),
        n => bail!("'{}' matches {} tasks; use a longer prefix", id, n),
    }
}

pub async fn execute(cmd: TaskCommands, project_dir: &Path) -> Result<()> {
    let workbench = Workbench::open(project_dir).await?;
    let store = &workbench.store;

    match cmd {
        TaskCommands::New(args) => {
            let status = args
                .status
                .as_deref()
                .map(str::parse::<TaskStatus>)
                .transpose()?;
            let task = kanban::quick_add(store, &args.title, status).await?;
            workbench
                .notifier
                .notify(&WorkbenchEvent::TaskAdded {
                    task_id: task.id.clone(),
                })
                .await;

            println!(
                "{} Created task: {} ({})",
                "✓".green().bold(),
                task.title.cyan(),
                output::short_id(&task.id).dimmed()
            );
        }

        TaskCommands::Move(args) => {
            let status: TaskStatus = args.status.parse()?;
            let task = resolve_task(store, &args.task_id)?;
            let task = kanban::move_task(store, &task.id, status).await?;
            workbench
                .notifier
                .notify_task_updated(&task.id, status.as_str())
                .await;

            println!(
                "{} Moved {} to {}",
                "✓".green().bold(),
                task.title.cyan(),
                status.title().bold()
            );
            if status == TaskStatus::Done {
                println!("🎉 {}", "Nice work!".bold());
            }
        }

        TaskCommands::List(args) => {
            let filter = args
                .status
                .as_deref()
                .map(str::parse::<TaskStatus>)
                .transpose()?;
            let tasks: Vec<Task> = store
                .tasks()
                .into_iter()
                .filter(|t| filter.map_or(true, |s| t.status == s))
                .collect();
            output::print_tasks_table(&tasks);
        }

        TaskCommands::Show(args) => {
            output::print_task(&resolve_task(store, &args.task_id)?);
        }

        TaskCommands::Edit(args) => {
            let task = resolve_task(store, &args.task_id)?;
            let details = TaskDetails {
                description: args.description,
                owner: args.owner,
                due_date: args.due,
            };
            let task = kanban::edit_task(store, &task.id, details).await?;
            workbench
                .notifier
                .notify_task_updated(&task.id, task.status.as_str())
                .await;
            println!("{} Updated {}", "✓".green().bold(), task.title.cyan());
        }

        TaskCommands::Subtask(args) => {
            let task = resolve_task(store, &args.task_id)?;
            let index = task.subtasks.len();
            kanban::add_subtask(store, &task.id).await?;
            let task = kanban::set_subtask(store, &task.id, index, &args.text).await?;
            workbench
                .notifier
                .notify_task_updated(&task.id, task.status.as_str())
                .await;
            println!(
                "{} Added subtask {} to {}",
                "✓".green().bold(),
                index,
                task.title.cyan()
            );
        }

        TaskCommands::DropSubtask(args) => {
            let task = resolve_task(store, &args.task_id)?;
            let task = kanban::remove_subtask(store, &task.id, args.index).await?;
            workbench
                .notifier
                .notify_task_updated(&task.id, task.status.as_str())
                .await;
            println!(
                "{} Removed subtask {} from {}",
                "✓".green().bold(),
                args.index,
                task.title.cyan()
            );
        }

        TaskCommands::Board => {
            output::print_board(&kanban::build_board(&store.tasks()));
        }

        TaskCommands::Seed => {
            if kanban::seed_if_empty(store).await? {
                workbench
                    .notifier
                    .notify(&WorkbenchEvent::TasksReplaced {
                        count: store.tasks().len(),
                    })
                    .await;
                println!("{} Loaded the sample board", "✓".green().bold());
            } else {
                println!("{}", "Board already has tasks; nothing to seed.".dimmed());
            }
        }

        TaskCommands::Suggest(args) => {
            let mut tray = SuggestionTray::new();
            let thinking = spinner("Generating suggestions...");
            tray.generate(store, workbench.ai.as_ref()).await;
            thinking.finish_and_clear();

            if tray.items().is_empty() {
                println!("{}", "No suggestions right now.".dimmed());
                return Ok(());
            }

            println!("{}", "AI suggestions".bold());
            for suggestion in tray.items() {
                println!("  {} {}", "✦".truecolor(255, 150, 66), suggestion);
            }

            if args.accept_all {
                let items = tray.items().to_vec();
                for suggestion in &items {
                    let task = tray.accept(store, suggestion).await?;
                    workbench
                        .notifier
                        .notify(&WorkbenchEvent::TaskAdded { task_id: task.id })
                        .await;
                }
                println!(
                    "{} Added {} task(s) to the parking lot",
                    "✓".green().bold(),
                    items.len()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_by_prefix() {
        let store = AppStore::in_memory();
        kanban::seed_if_empty(&store).await.unwrap();
        let first = store.tasks()[0].clone();

        assert_eq!(resolve_task(&store, &first.id).unwrap().id, first.id);
        assert_eq!(resolve_task(&store, &first.id[..8]).unwrap().id, first.id);
        assert!(resolve_task(&store, "zzzz").is_err());
        // The empty prefix matches every task.
        assert!(resolve_task(&store, "").is_err());
    }
}
