//! Centralized error types for the workbench.

use thiserror::Error;

/// Main error type for workbench operations.
#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Unknown task status: {0}")]
    UnknownStatus(String),

    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("Integration not found: {0}")]
    IntegrationNotFound(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Team member not found: {0}")]
    MemberNotFound(String),

    #[error("Happiness score must be between 1 and 5, got {0}")]
    InvalidScore(u8),

    #[error("Pulse already submitted by '{user_id}' for {month}")]
    PulseAlreadySubmitted { user_id: String, month: String },

    #[error("Onboarding is already complete")]
    OnboardingComplete,

    #[error("Stand-up is already complete")]
    StandupComplete,

    #[error("Not in a call")]
    NotInCall,

    #[error("AI request failed: {0}")]
    Ai(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    Store(#[from] jw_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for workbench operations.
pub type WorkbenchResult<T> = Result<T, WorkbenchError>;

impl WorkbenchError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an AI error.
    pub fn ai(msg: impl Into<String>) -> Self {
        Self::Ai(msg.into())
    }
}
