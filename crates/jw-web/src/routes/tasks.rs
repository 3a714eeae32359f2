//! Task and board route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use jw_core::kanban::{self, Board, TaskDetails};
use jw_core::model::{Task, TaskStatus};

use super::{error_response, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub description: Option<String>,
    pub owner: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Deserialize)]
pub struct MoveTaskRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct SubtaskRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct SuggestionRequest {
    pub suggestion: String,
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

fn parse_status(raw: &str) -> Result<TaskStatus, (StatusCode, String)> {
    raw.parse().map_err(error_response)
}

pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.store.tasks())
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Task> {
    state
        .store
        .task(&id)
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Task not found: {}", id)))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    let status = req.status.as_deref().map(parse_status).transpose()?;
    let task = kanban::quick_add(&state.store, &req.title, status)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Task> {
    let details = TaskDetails {
        description: req.description,
        owner: req.owner,
        due_date: req.due_date,
    };
    kanban::edit_task(&state.store, &id, details)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn move_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveTaskRequest>,
) -> ApiResult<Task> {
    let status = parse_status(&req.status)?;
    kanban::move_task(&state.store, &id, status)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn add_subtask(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Task> {
    kanban::add_subtask(&state.store, &id)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn set_subtask(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    Json(req): Json<SubtaskRequest>,
) -> ApiResult<Task> {
    kanban::set_subtask(&state.store, &id, index, &req.text)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn remove_subtask(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> ApiResult<Task> {
    kanban::remove_subtask(&state.store, &id, index)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_board(State(state): State<AppState>) -> Json<Board> {
    Json(kanban::build_board(&state.store.tasks()))
}

/// Load the sample board when there are no tasks yet.
pub async fn seed_board(State(state): State<AppState>) -> ApiResult<Board> {
    kanban::seed_if_empty(&state.store)
        .await
        .map_err(error_response)?;
    Ok(get_board(State(state)).await)
}

pub async fn list_suggestions(State(state): State<AppState>) -> Json<SuggestionsResponse> {
    let tray = state.screens.suggestions.lock().await;
    Json(SuggestionsResponse {
        suggestions: tray.items().to_vec(),
    })
}

pub async fn generate_suggestions(State(state): State<AppState>) -> Json<SuggestionsResponse> {
    let mut tray = state.screens.suggestions.lock().await;
    let suggestions = tray
        .generate(&state.store, state.ai.as_ref())
        .await
        .to_vec();
    Json(SuggestionsResponse { suggestions })
}

pub async fn accept_suggestion(
    State(state): State<AppState>,
    Json(req): Json<SuggestionRequest>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    let task = state
        .screens
        .suggestions
        .lock()
        .await
        .accept(&state.store, &req.suggestion)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn dismiss_suggestion(
    State(state): State<AppState>,
    Json(req): Json<SuggestionRequest>,
) -> Json<SuggestionsResponse> {
    let mut tray = state.screens.suggestions.lock().await;
    tray.dismiss(&req.suggestion);
    Json(SuggestionsResponse {
        suggestions: tray.items().to_vec(),
    })
}
