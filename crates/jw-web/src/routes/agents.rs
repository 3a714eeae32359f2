//! AI agent routes.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use jw_core::agents::{AgentKind, AgentTask};

use super::{error_response, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AgentInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: [&'static str; 4],
}

#[derive(Serialize)]
pub struct AgentsResponse {
    pub agents: Vec<AgentInfo>,
    pub tasks: Vec<AgentTask>,
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub description: String,
}

pub async fn list_agents(State(state): State<AppState>) -> Json<AgentsResponse> {
    let agents = AgentKind::ALL
        .iter()
        .map(|kind| AgentInfo {
            id: kind.id(),
            name: kind.name(),
            description: kind.description(),
            capabilities: kind.capabilities(),
        })
        .collect();
    let tasks = state.screens.agents.lock().await.tasks().to_vec();
    Json(AgentsResponse { agents, tasks })
}

pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<AgentTask> {
    let agent: AgentKind = id.parse().map_err(error_response)?;
    state
        .screens
        .agents
        .lock()
        .await
        .assign(agent, &req.description, state.ai.as_ref())
        .await
        .map(Json)
        .map_err(error_response)
}
