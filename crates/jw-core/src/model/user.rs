//! Authenticated user and auth state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl User {
    /// Name to show in the UI: display name, else the email local part.
    pub fn label(&self) -> &str {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// What the auth provider pushes on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_falls_back_to_email() {
        let mut user = User {
            id: "u1".into(),
            email: "sarah@company.com".into(),
            display_name: None,
        };
        assert_eq!(user.label(), "sarah");
        user.display_name = Some("Sarah Chen".into());
        assert_eq!(user.label(), "Sarah Chen");
    }

    #[test]
    fn test_auth_state_wire_format() {
        let json = serde_json::to_string(&AuthState::default()).unwrap();
        assert_eq!(json, r#"{"user":null,"isLoading":true}"#);
    }
}
