//! Dashboard routes.

use axum::{extract::State, response::Html, Json};

use jw_core::dashboard::{self, Overview};

use crate::state::AppState;

/// Serve the single-page workbench.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../../../assets/web/index.html"))
}

pub async fn overview(State(state): State<AppState>) -> Json<Overview> {
    Json(dashboard::overview(&state.store))
}
