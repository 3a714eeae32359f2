//! Jungwell Core Library
//!
//! Domain models, the application store, the view router and the logic
//! behind every workbench screen.

pub mod agents;
pub mod ai;
pub mod analytics;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod easter_egg;
pub mod error;
pub mod integrations;
pub mod kanban;
pub mod model;
pub mod notifier;
pub mod onboarding;
pub mod pulse;
pub mod realtime;
pub mod router;
pub mod settings;
pub mod standup;
pub mod store;

pub use error::{WorkbenchError, WorkbenchResult};
pub use router::{route, Screen, Shell};
pub use store::AppStore;
