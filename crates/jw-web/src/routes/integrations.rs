//! Integration hub routes.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use jw_core::integrations::{
    ConnectOutcome, Integration, IntegrationConfig, IntegrationHub, IntegrationStatus, StatusCounts,
};

use super::{error_response, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubResponse {
    pub integrations: Vec<Integration>,
    pub counts: StatusCounts,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub outcome: ConnectOutcome,
    pub integration: Integration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub status: IntegrationStatus,
    pub integration: Integration,
}

fn snapshot(hub: &IntegrationHub) -> HubResponse {
    HubResponse {
        integrations: hub.integrations().to_vec(),
        counts: hub.status_counts(),
    }
}

pub async fn list_integrations(State(state): State<AppState>) -> Json<HubResponse> {
    Json(snapshot(&*state.screens.integrations.lock().await))
}

pub async fn get_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<IntegrationConfig> {
    let hub = state.screens.integrations.lock().await;
    hub.get(&id).map_err(error_response)?;
    Ok(Json(hub.config(&id).cloned().unwrap_or_default()))
}

pub async fn connect(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ConnectResponse> {
    let mut hub = state.screens.integrations.lock().await;
    let outcome = hub.connect(&id).await.map_err(error_response)?;
    let integration = hub.get(&id).map_err(error_response)?.clone();
    Ok(Json(ConnectResponse {
        outcome,
        integration,
    }))
}

pub async fn configure(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(config): Json<IntegrationConfig>,
) -> ApiResult<Integration> {
    let mut hub = state.screens.integrations.lock().await;
    hub.configure(&id, config).map_err(error_response)?;
    hub.get(&id).cloned().map(Json).map_err(error_response)
}

pub async fn disconnect(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Integration> {
    let mut hub = state.screens.integrations.lock().await;
    hub.disconnect(&id).map_err(error_response)?;
    hub.get(&id).cloned().map(Json).map_err(error_response)
}

pub async fn sync(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SyncResponse> {
    let mut hub = state.screens.integrations.lock().await;
    let status = hub.sync(&id).await.map_err(error_response)?;
    let integration = hub.get(&id).map_err(error_response)?.clone();
    Ok(Json(SyncResponse {
        status,
        integration,
    }))
}
