//! Whole-store routes: snapshot, navigation and reset.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use jw_core::model::View;
use jw_core::router::Screen;
use jw_core::store::AppState as StoreState;

use super::{error_response, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: StoreState,
    pub screen: Screen,
}

#[derive(Deserialize)]
pub struct ViewRequest {
    pub view: String,
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(StateResponse {
        state: state.store.snapshot(),
        screen: state.store.screen(),
    })
}

/// Navigate. Unknown view ids are rejected; the router decides which
/// screen actually renders.
pub async fn set_view(
    State(state): State<AppState>,
    Json(req): Json<ViewRequest>,
) -> ApiResult<StateResponse> {
    let view: View = req.view.parse().map_err(error_response)?;
    state
        .store
        .set_current_view(view)
        .await
        .map_err(error_response)?;
    Ok(get_state(State(state)).await)
}

/// Clear persisted state. The signed-in user is kept.
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    state.store.reset().await.map_err(error_response)?;
    state.store.set_user(state.auth.current().user);
    Ok(StatusCode::NO_CONTENT)
}
