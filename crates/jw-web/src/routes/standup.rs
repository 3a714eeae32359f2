//! Stand-up routes.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use jw_core::model::team::sample_team;
use jw_core::standup::{self, StandupProgress, StandupSession, COMPLETION_SUMMARY};

use super::{error_response, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandupResponse {
    pub session: StandupSession,
    pub progress: StandupProgress,
    pub position: String,
    pub is_recording: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'static str>,
    pub disco: Option<(&'static str, &'static str)>,
}

#[derive(Deserialize)]
pub struct KeyRequest {
    pub key: String,
}

fn snapshot(session: &StandupSession) -> StandupResponse {
    StandupResponse {
        session: session.clone(),
        progress: session.progress(),
        position: session.position_label(),
        is_recording: session.is_recording(),
        summary: session.is_complete().then_some(COMPLETION_SUMMARY),
        disco: session.easter_egg().disco_colors(),
    }
}

pub async fn get_standup(State(state): State<AppState>) -> Json<StandupResponse> {
    Json(snapshot(&*state.screens.standup.lock().await))
}

/// Enter stand-up mode with a fresh session over the current team.
pub async fn start(State(state): State<AppState>) -> ApiResult<StandupResponse> {
    standup::start(&state.store).await.map_err(error_response)?;

    let members = match state.store.team_members() {
        members if members.is_empty() => sample_team(),
        members => members,
    };
    let mut session = state.screens.standup.lock().await;
    *session = StandupSession::with_members(
        members,
        state.timing.standup_advance(),
        state.timing.easter_egg(),
    );
    Ok(Json(snapshot(&session)))
}

pub async fn start_recording(State(state): State<AppState>) -> ApiResult<StandupResponse> {
    let mut session = state.screens.standup.lock().await;
    session.start_recording().map_err(error_response)?;
    Ok(Json(snapshot(&session)))
}

pub async fn stop_recording(State(state): State<AppState>) -> ApiResult<StandupResponse> {
    let mut session = state.screens.standup.lock().await;
    session.stop_recording().await.map_err(error_response)?;
    Ok(Json(snapshot(&session)))
}

pub async fn advance(State(state): State<AppState>) -> ApiResult<StandupResponse> {
    let mut session = state.screens.standup.lock().await;
    session.advance().map_err(error_response)?;
    Ok(Json(snapshot(&session)))
}

pub async fn press_key(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Json<StandupResponse> {
    let mut session = state.screens.standup.lock().await;
    session.press_key(&req.key);
    Json(snapshot(&session))
}

pub async fn finish(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    standup::finish(&state.store).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
