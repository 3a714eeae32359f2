//! Internal notification endpoints.

use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info, warn};

use jw_store::WorkbenchEvent;

use crate::state::AppState;

/// Receive a change made by another process (the CLI), reload persisted
/// state and broadcast to all WebSocket clients.
pub async fn notify(
    State(state): State<AppState>,
    Json(event): Json<WorkbenchEvent>,
) -> StatusCode {
    info!(?event, "Received internal notification, broadcasting to WebSocket clients");
    if let Err(e) = state.store.hydrate().await {
        warn!(error = %e, "Failed to reload state after notification");
    }
    let receiver_count = state.store.events().receiver_count();
    debug!(receiver_count, "Active WebSocket receivers");
    state.broadcast(event);
    StatusCode::OK
}
