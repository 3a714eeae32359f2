//! Voice collaboration routes.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use jw_core::realtime::{CollaborationRoom, RoomMessage, RoomSnapshot};
use jw_store::WorkbenchEvent;

use super::{error_response, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub enabled: bool,
}

/// Current room, after draining pending channel messages.
pub async fn get_room(State(state): State<AppState>) -> Json<RoomSnapshot> {
    let mut room = state.screens.room.lock().await;
    room.receive_pending();
    Json(room.snapshot())
}

/// Join as the signed-in user, or as the default guest identity.
pub async fn join(State(state): State<AppState>) -> ApiResult<RoomSnapshot> {
    let mut room = state.screens.room.lock().await;
    if !room.is_in_call() {
        if let Some(user) = state.auth.current().user {
            *room = CollaborationRoom::new(state.channel.clone(), state.timing.join_call())
                .with_identity(user.id.clone(), user.label());
        }
    }
    room.join().await.map_err(error_response)?;
    Ok(Json(room.snapshot()))
}

pub async fn leave(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    let mut room = state.screens.room.lock().await;
    room.leave().await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<(StatusCode, Json<RoomMessage>), (StatusCode, String)> {
    let message = state
        .screens
        .room
        .lock()
        .await
        .send_message(&req.content)
        .await
        .map_err(error_response)?;
    state.broadcast(WorkbenchEvent::ChatMessage {
        user_name: message.user_name.clone(),
        content: message.content.clone(),
    });
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn toggle_mute(State(state): State<AppState>) -> Json<ToggleResponse> {
    let enabled = state.screens.room.lock().await.toggle_mute();
    Json(ToggleResponse { enabled })
}

pub async fn toggle_video(State(state): State<AppState>) -> Json<ToggleResponse> {
    let enabled = state.screens.room.lock().await.toggle_video();
    Json(ToggleResponse { enabled })
}

pub async fn toggle_hand(State(state): State<AppState>) -> Json<ToggleResponse> {
    let enabled = state.screens.room.lock().await.toggle_hand();
    Json(ToggleResponse { enabled })
}
