//! Jungwell Web Server
//!
//! Axum-based web server for the workbench page, the REST API and the
//! live event stream.

pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// Reject API calls made while nobody is signed in.
async fn require_user(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    if state.auth.current().user.is_none() {
        return (StatusCode::UNAUTHORIZED, "Sign in to use the workbench").into_response();
    }
    next.run(req).await
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let workbench_routes = Router::new()
        // Store
        .route("/state", get(routes::app::get_state))
        .route("/view", put(routes::app::set_view))
        .route("/reset", post(routes::app::reset))
        .route("/dashboard", get(routes::dashboard::overview))
        // Onboarding
        .route("/onboarding", get(routes::onboarding::get_conversation))
        .route("/onboarding/answer", post(routes::onboarding::answer))
        .route("/onboarding/launch", post(routes::onboarding::launch))
        // Tasks
        .route("/tasks", get(routes::tasks::list_tasks))
        .route("/tasks", post(routes::tasks::create_task))
        .route("/tasks/{id}", get(routes::tasks::get_task))
        .route("/tasks/{id}", put(routes::tasks::update_task))
        .route("/tasks/{id}/move", post(routes::tasks::move_task))
        .route("/tasks/{id}/subtasks", post(routes::tasks::add_subtask))
        .route("/tasks/{id}/subtasks/{index}", put(routes::tasks::set_subtask))
        .route("/tasks/{id}/subtasks/{index}", delete(routes::tasks::remove_subtask))
        .route("/board", get(routes::tasks::get_board))
        .route("/board/seed", post(routes::tasks::seed_board))
        .route("/suggestions", get(routes::tasks::list_suggestions))
        .route("/suggestions/generate", post(routes::tasks::generate_suggestions))
        .route("/suggestions/accept", post(routes::tasks::accept_suggestion))
        .route("/suggestions/dismiss", post(routes::tasks::dismiss_suggestion))
        // Stand-up
        .route("/standup", get(routes::standup::get_standup))
        .route("/standup/start", post(routes::standup::start))
        .route("/standup/record", post(routes::standup::start_recording))
        .route("/standup/stop", post(routes::standup::stop_recording))
        .route("/standup/advance", post(routes::standup::advance))
        .route("/standup/key", post(routes::standup::press_key))
        .route("/standup/finish", post(routes::standup::finish))
        // Happiness pulse
        .route("/pulse", get(routes::pulse::get_pulse))
        .route("/pulse", post(routes::pulse::submit))
        // Analytics
        .route("/analytics", get(routes::analytics::get_analytics))
        .route("/analytics/period", put(routes::analytics::select_period))
        .route("/analytics/refresh", post(routes::analytics::refresh))
        .route("/analytics/kpis/{id}", get(routes::analytics::get_kpi))
        // Integrations
        .route("/integrations", get(routes::integrations::list_integrations))
        .route("/integrations/{id}/config", get(routes::integrations::get_config))
        .route("/integrations/{id}/config", put(routes::integrations::configure))
        .route("/integrations/{id}/connect", post(routes::integrations::connect))
        .route("/integrations/{id}/disconnect", post(routes::integrations::disconnect))
        .route("/integrations/{id}/sync", post(routes::integrations::sync))
        // Settings
        .route("/settings", get(routes::settings::get_settings))
        .route("/settings/members", post(routes::settings::invite))
        .route("/settings/members/{id}", put(routes::settings::update_member))
        .route("/settings/members/{id}", delete(routes::settings::remove_member))
        .route("/settings/integrations/{id}/toggle", post(routes::settings::toggle_integration))
        .route("/settings/notifications", put(routes::settings::set_notification))
        .route("/settings/company", put(routes::settings::update_company))
        .route("/settings/goals", post(routes::settings::add_goal))
        .route("/settings/goals/{index}", put(routes::settings::set_goal))
        .route("/settings/goals/{index}", delete(routes::settings::remove_goal))
        .route("/settings/systems/{index}", delete(routes::settings::remove_system))
        // Agents
        .route("/agents", get(routes::agents::list_agents))
        .route("/agents/{id}/tasks", post(routes::agents::assign))
        // Voice room
        .route("/room", get(routes::realtime::get_room))
        .route("/room/join", post(routes::realtime::join))
        .route("/room/leave", post(routes::realtime::leave))
        .route("/room/messages", post(routes::realtime::send_message))
        .route("/room/mute", post(routes::realtime::toggle_mute))
        .route("/room/video", post(routes::realtime::toggle_video))
        .route("/room/hand", post(routes::realtime::toggle_hand))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let api_routes = Router::new()
        .route("/session", get(routes::auth::get_session))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .merge(workbench_routes)
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::dashboard::index))
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .route("/internal/notify", post(routes::internal::notify))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
