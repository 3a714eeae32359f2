//! Team members.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberStatus {
    Online,
    Offline,
    InStandup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub status: MemberStatus,
}

impl TeamMember {
    pub fn new(id: &str, name: &str, role: &str, avatar: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            avatar: Some(avatar.to_string()),
            status: MemberStatus::Online,
        }
    }
}

/// The three sample teammates shown across the dashboard, stand-up and
/// settings screens.
pub fn sample_team() -> Vec<TeamMember> {
    vec![
        TeamMember::new("1", "Sarah Chen", "CS Manager", "👩‍💼"),
        TeamMember::new("2", "Mike Rodriguez", "CS Specialist", "👨‍💻"),
        TeamMember::new("3", "Emma Thompson", "CS Analyst", "👩‍📊"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&MemberStatus::InStandup).unwrap(),
            "\"in-standup\""
        );
    }
}
