//! View identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WorkbenchError;

/// The view the user asked for. Routing may override it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Onboarding,
    Dashboard,
    Kanban,
    Standup,
    Analytics,
    Settings,
    Integrations,
    Voice,
}

impl View {
    pub const ALL: [View; 8] = [
        View::Onboarding,
        View::Dashboard,
        View::Kanban,
        View::Standup,
        View::Analytics,
        View::Settings,
        View::Integrations,
        View::Voice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Dashboard => "dashboard",
            Self::Kanban => "kanban",
            Self::Standup => "standup",
            Self::Analytics => "analytics",
            Self::Settings => "settings",
            Self::Integrations => "integrations",
            Self::Voice => "voice",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = WorkbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        View::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or_else(|| WorkbenchError::UnknownView(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_every_view() {
        for view in View::ALL {
            assert_eq!(view.as_str().parse::<View>().unwrap(), view);
        }
        assert!("reports".parse::<View>().is_err());
    }
}
