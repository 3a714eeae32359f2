//! Impact analytics routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use jw_core::analytics::{AnalyticsView, Kpi, Period, INSIGHTS};

use super::{error_response, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub view: AnalyticsView,
    pub on_track: usize,
    pub insights: Vec<Insight>,
}

#[derive(Serialize)]
pub struct Insight {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Deserialize)]
pub struct PeriodRequest {
    pub period: String,
}

fn snapshot(view: &AnalyticsView) -> AnalyticsResponse {
    AnalyticsResponse {
        view: view.clone(),
        on_track: view.on_track_count(),
        insights: INSIGHTS
            .iter()
            .map(|&(title, body)| Insight { title, body })
            .collect(),
    }
}

pub async fn get_analytics(State(state): State<AppState>) -> Json<AnalyticsResponse> {
    Json(snapshot(&*state.screens.analytics.lock().await))
}

pub async fn get_kpi(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Kpi> {
    let view = state.screens.analytics.lock().await;
    view.kpi(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("KPI not found: {}", id)))
}

pub async fn select_period(
    State(state): State<AppState>,
    Json(req): Json<PeriodRequest>,
) -> ApiResult<AnalyticsResponse> {
    let period: Period = req.period.parse().map_err(error_response)?;
    let mut view = state.screens.analytics.lock().await;
    view.select_period(period);
    Ok(Json(snapshot(&view)))
}

pub async fn refresh(State(state): State<AppState>) -> Json<AnalyticsResponse> {
    let mut view = state.screens.analytics.lock().await;
    view.refresh().await;
    Json(snapshot(&view))
}
