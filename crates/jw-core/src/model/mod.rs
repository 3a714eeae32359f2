//! Workbench domain models.
//!
//! Field names serialize in camelCase so the persisted blob keeps the
//! browser storage layout.

pub mod chat;
pub mod onboarding;
pub mod pulse;
pub mod task;
pub mod team;
pub mod user;
pub mod view;

pub use chat::{ChatMessage, MessageKind, Sender};
pub use onboarding::{OnboardingData, OnboardingPatch};
pub use pulse::HappinessPulse;
pub use task::{Task, TaskPatch, TaskStatus};
pub use team::{MemberStatus, TeamMember};
pub use user::{AuthState, User};
pub use view::View;
