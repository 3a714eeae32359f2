//! Happiness pulse routes.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use jw_core::model::HappinessPulse;
use jw_core::pulse::{self, HappinessLevel, PulseSummary, CURRENT_USER, LEVELS};

use super::error_response;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseResponse {
    pub levels: [HappinessLevel; 5],
    pub has_submitted: bool,
    pub summary: PulseSummary,
}

#[derive(Deserialize)]
pub struct SubmitPulseRequest {
    pub score: u8,
    #[serde(default)]
    pub suggestion: String,
}

fn user_id(state: &AppState) -> String {
    state
        .auth
        .current()
        .user
        .map(|u| u.id)
        .unwrap_or_else(|| CURRENT_USER.to_string())
}

pub async fn get_pulse(State(state): State<AppState>) -> Json<PulseResponse> {
    let month = pulse::month_key(Utc::now());
    Json(PulseResponse {
        levels: LEVELS,
        has_submitted: pulse::has_submitted(&state.store.happiness_pulse(), &user_id(&state), &month),
        summary: pulse::team_summary(&state.store),
    })
}

pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitPulseRequest>,
) -> Result<(StatusCode, Json<HappinessPulse>), (StatusCode, String)> {
    let pulse = pulse::submit(
        &state.store,
        &user_id(&state),
        req.score,
        &req.suggestion,
        Utc::now(),
    )
    .await
    .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(pulse)))
}
