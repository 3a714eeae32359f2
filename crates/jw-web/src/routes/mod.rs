//! Route handlers.

pub mod agents;
pub mod analytics;
pub mod app;
pub mod auth;
pub mod dashboard;
pub mod integrations;
pub mod internal;
pub mod onboarding;
pub mod pulse;
pub mod realtime;
pub mod settings;
pub mod standup;
pub mod tasks;

use axum::{http::StatusCode, Json};
use jw_core::WorkbenchError;

/// Handler result: JSON body or a status with a plain message.
pub type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Map a workbench error to an HTTP status.
pub fn error_response(e: WorkbenchError) -> (StatusCode, String) {
    let status = match &e {
        WorkbenchError::TaskNotFound(_)
        | WorkbenchError::IntegrationNotFound(_)
        | WorkbenchError::AgentNotFound(_)
        | WorkbenchError::MemberNotFound(_) => StatusCode::NOT_FOUND,
        WorkbenchError::UnknownStatus(_)
        | WorkbenchError::UnknownView(_)
        | WorkbenchError::InvalidScore(_)
        | WorkbenchError::ValidationError(_) => StatusCode::BAD_REQUEST,
        WorkbenchError::PulseAlreadySubmitted { .. }
        | WorkbenchError::OnboardingComplete
        | WorkbenchError::StandupComplete
        | WorkbenchError::NotInCall => StatusCode::CONFLICT,
        WorkbenchError::Ai(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %e, "Request failed");
    }
    (status, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_response(WorkbenchError::TaskNotFound("t1".into())).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(WorkbenchError::InvalidScore(9)).0,
            StatusCode::BAD_REQUEST
        );
        let (status, message) = error_response(WorkbenchError::PulseAlreadySubmitted {
            user_id: "u1".into(),
            month: "2024-03".into(),
        });
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(message.contains("2024-03"));
        assert_eq!(
            error_response(WorkbenchError::Config("bad".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
