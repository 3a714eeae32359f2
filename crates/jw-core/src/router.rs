//! View routing.
//!
//! Pure functions from store state to the screen that should be shown.
//! There is no history stack and no nested routing.

use serde::{Deserialize, Serialize};

use crate::model::{AuthState, View};

/// One of the eight workbench screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Onboarding,
    Dashboard,
    Kanban,
    Standup,
    Analytics,
    Integrations,
    Settings,
    Realtime,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Onboarding => "AI Scrum Master",
            Self::Dashboard => "Dashboard",
            Self::Kanban => "Kanban Board",
            Self::Standup => "Stand-up",
            Self::Analytics => "Impact Analytics",
            Self::Integrations => "Integrations",
            Self::Settings => "Team Settings",
            Self::Realtime => "Voice Collaboration",
        }
    }
}

/// Pick the screen for a requested view.
///
/// Until onboarding is complete the onboarding screen is always returned.
/// Afterwards the view maps to its screen, and anything without a screen of
/// its own (including `onboarding`) falls back to the dashboard.
pub fn route(onboarding_complete: bool, view: View) -> Screen {
    if !onboarding_complete {
        return Screen::Onboarding;
    }

    match view {
        View::Dashboard => Screen::Dashboard,
        View::Standup => Screen::Standup,
        View::Kanban => Screen::Kanban,
        View::Analytics => Screen::Analytics,
        View::Settings => Screen::Settings,
        View::Integrations => Screen::Integrations,
        View::Voice => Screen::Realtime,
        View::Onboarding => Screen::Dashboard,
    }
}

/// [`route`] for a raw view identifier; unknown identifiers take the
/// default branch.
pub fn route_str(onboarding_complete: bool, view: &str) -> Screen {
    let parsed = view.parse::<View>().unwrap_or(View::Dashboard);
    route(onboarding_complete, parsed)
}

/// Top-level tree: loading, signed out, or a routed screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "screen", rename_all = "kebab-case")]
pub enum Shell {
    Loading,
    SignedOut,
    SignedIn(Screen),
}

/// Combine auth state with routing.
pub fn shell(auth: &AuthState, onboarding_complete: bool, view: View) -> Shell {
    if auth.is_loading {
        return Shell::Loading;
    }
    match auth.user {
        None => Shell::SignedOut,
        Some(_) => Shell::SignedIn(route(onboarding_complete, view)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    #[test]
    fn test_incomplete_onboarding_always_routes_to_onboarding() {
        for view in View::ALL {
            assert_eq!(route(false, view), Screen::Onboarding);
        }
    }

    #[test]
    fn test_complete_onboarding_never_routes_to_onboarding() {
        for view in View::ALL {
            assert_ne!(route(true, view), Screen::Onboarding);
        }
    }

    #[test]
    fn test_dispatch_by_view() {
        assert_eq!(route(true, View::Kanban), Screen::Kanban);
        assert_eq!(route(true, View::Voice), Screen::Realtime);
        assert_eq!(route(true, View::Settings), Screen::Settings);
        assert_eq!(route(true, View::Onboarding), Screen::Dashboard);
    }

    #[test]
    fn test_unknown_identifier_falls_back() {
        assert_eq!(route_str(true, "reports"), Screen::Dashboard);
        assert_eq!(route_str(true, "analytics"), Screen::Analytics);
        assert_eq!(route_str(false, "analytics"), Screen::Onboarding);
    }

    #[test]
    fn test_shell_states() {
        let loading = AuthState::default();
        assert_eq!(shell(&loading, true, View::Kanban), Shell::Loading);

        let signed_out = AuthState {
            user: None,
            is_loading: false,
        };
        assert_eq!(shell(&signed_out, true, View::Kanban), Shell::SignedOut);

        let signed_in = AuthState {
            user: Some(User {
                id: "u1".into(),
                email: "a@b.c".into(),
                display_name: None,
            }),
            is_loading: false,
        };
        assert_eq!(
            shell(&signed_in, false, View::Kanban),
            Shell::SignedIn(Screen::Onboarding)
        );
        assert_eq!(
            shell(&signed_in, true, View::Kanban),
            Shell::SignedIn(Screen::Kanban)
        );
    }
}
