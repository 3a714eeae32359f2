//! Onboarding chat routes.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use jw_core::model::{ChatMessage, OnboardingData, Task};
use jw_core::onboarding::{self, OnboardingStep};

use super::{error_response, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub messages: Vec<ChatMessage>,
    pub progress: String,
    pub is_finished: bool,
    pub data: OnboardingData,
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    pub step: OnboardingStep,
    pub conversation: ConversationResponse,
}

#[derive(Serialize)]
pub struct LaunchResponse {
    pub backlog: Vec<Task>,
}

async fn conversation(state: &AppState) -> ConversationResponse {
    let session = state.screens.onboarding.lock().await;
    ConversationResponse {
        messages: session.messages().to_vec(),
        progress: session.progress_label(),
        is_finished: session.is_finished(),
        data: state.store.onboarding(),
    }
}

pub async fn get_conversation(State(state): State<AppState>) -> Json<ConversationResponse> {
    Json(conversation(&state).await)
}

pub async fn answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> ApiResult<AnswerResponse> {
    let step = state
        .screens
        .onboarding
        .lock()
        .await
        .submit_answer(&state.store, &req.answer)
        .await
        .map_err(error_response)?;
    Ok(Json(AnswerResponse {
        step,
        conversation: conversation(&state).await,
    }))
}

/// Seed the backlog from the answers and open the dashboard.
pub async fn launch(State(state): State<AppState>) -> ApiResult<LaunchResponse> {
    let backlog = onboarding::launch_workbench(&state.store, state.ai.as_ref())
        .await
        .map_err(error_response)?;
    Ok(Json(LaunchResponse { backlog }))
}
