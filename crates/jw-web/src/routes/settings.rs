//! Team settings routes.
//!
//! Roster edits are published to the store so the dashboard and stand-up
//! see the same team.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use jw_core::model::OnboardingData;
use jw_core::settings::{self, MemberPatch, RosterMember, TeamSettings};

use super::{error_response, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    #[serde(flatten)]
    pub settings: TeamSettings,
    pub company: OnboardingData,
}

#[derive(Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct NotificationRequest {
    pub key: String,
    pub enabled: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    pub company_description: Option<String>,
    pub team_size: Option<String>,
}

#[derive(Deserialize)]
pub struct GoalRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub items: Vec<String>,
}

async fn snapshot(state: &AppState) -> SettingsResponse {
    SettingsResponse {
        settings: state.screens.settings.lock().await.clone(),
        company: state.store.onboarding(),
    }
}

pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(snapshot(&state).await)
}

pub async fn invite(
    State(state): State<AppState>,
    Json(req): Json<InviteRequest>,
) -> Result<(StatusCode, Json<RosterMember>), (StatusCode, String)> {
    let mut team = state.screens.settings.lock().await;
    let member = team.invite(&req.email).map_err(error_response)?;
    team.publish_team(&state.store).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MemberPatch>,
) -> ApiResult<RosterMember> {
    let mut team = state.screens.settings.lock().await;
    let member = team.update_member(&id, patch).map_err(error_response)?;
    team.publish_team(&state.store).await.map_err(error_response)?;
    Ok(Json(member))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<RosterMember> {
    let mut team = state.screens.settings.lock().await;
    let member = team.remove_member(&id).map_err(error_response)?;
    team.publish_team(&state.store).await.map_err(error_response)?;
    Ok(Json(member))
}

pub async fn toggle_integration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SettingsResponse> {
    state
        .screens
        .settings
        .lock()
        .await
        .toggle_integration(&id)
        .map_err(error_response)?;
    Ok(Json(snapshot(&state).await))
}

pub async fn set_notification(
    State(state): State<AppState>,
    Json(req): Json<NotificationRequest>,
) -> ApiResult<SettingsResponse> {
    state
        .screens
        .settings
        .lock()
        .await
        .notifications
        .set(&req.key, req.enabled)
        .map_err(error_response)?;
    Ok(Json(snapshot(&state).await))
}

pub async fn update_company(
    State(state): State<AppState>,
    Json(req): Json<CompanyRequest>,
) -> ApiResult<OnboardingData> {
    if let Some(text) = req.company_description {
        settings::set_company_description(&state.store, &text)
            .await
            .map_err(error_response)?;
    }
    if let Some(text) = req.team_size {
        settings::set_team_size(&state.store, &text)
            .await
            .map_err(error_response)?;
    }
    Ok(Json(state.store.onboarding()))
}

pub async fn add_goal(State(state): State<AppState>) -> ApiResult<ListResponse> {
    let items = settings::add_goal(&state.store).await.map_err(error_response)?;
    Ok(Json(ListResponse { items }))
}

pub async fn set_goal(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<GoalRequest>,
) -> ApiResult<ListResponse> {
    let items = settings::set_goal(&state.store, index, &req.text)
        .await
        .map_err(error_response)?;
    Ok(Json(ListResponse { items }))
}

pub async fn remove_goal(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<ListResponse> {
    let items = settings::remove_goal(&state.store, index)
        .await
        .map_err(error_response)?;
    Ok(Json(ListResponse { items }))
}

pub async fn remove_system(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<ListResponse> {
    let items = settings::remove_system(&state.store, index)
        .await
        .map_err(error_response)?;
    Ok(Json(ListResponse { items }))
}
