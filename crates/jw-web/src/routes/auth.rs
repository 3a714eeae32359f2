//! Sign-in and session routes.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use jw_core::model::{AuthState, User};
use jw_core::router::{self, Shell};

use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub auth: AuthState,
    pub shell: Shell,
}

fn session(state: &AppState) -> SessionResponse {
    let auth = state.auth.current();
    let shell = router::shell(
        &auth,
        state.store.onboarding().is_complete,
        state.store.current_view(),
    );
    SessionResponse { auth, shell }
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(session(&state))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let email = req.email.trim();
    if !email.contains('@') {
        return Err((StatusCode::BAD_REQUEST, "A valid email is required".to_string()));
    }

    state.auth.sign_in(User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.to_string(),
        display_name: req.display_name.filter(|n| !n.trim().is_empty()),
    });
    Ok(Json(session(&state)))
}

pub async fn logout(State(state): State<AppState>) -> Json<SessionResponse> {
    state.auth.sign_out();
    Json(session(&state))
}
