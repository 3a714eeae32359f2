//! Team settings: roster, integration toggles, notification preferences and
//! the company profile captured during onboarding.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{WorkbenchError, WorkbenchResult};
use crate::model::{MemberStatus, OnboardingPatch, TeamMember};
use crate::store::AppStore;

/// Role given to invited members.
pub const DEFAULT_ROLE: &str = "CS Specialist";
pub const DEFAULT_AVATAR: &str = "👤";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// A roster entry with contact details and permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: String,
    pub status: AccountStatus,
    pub permissions: Vec<String>,
}

impl RosterMember {
    fn sample(id: &str, name: &str, email: &str, role: &str, avatar: &str, perms: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            avatar: avatar.to_string(),
            status: AccountStatus::Active,
            permissions: perms.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Display form used by the dashboard and stand-up.
    pub fn to_team_member(&self) -> TeamMember {
        TeamMember {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            avatar: Some(self.avatar.clone()),
            status: match self.status {
                AccountStatus::Active => MemberStatus::Online,
                AccountStatus::Inactive => MemberStatus::Offline,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<AccountStatus>,
    pub permissions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationToggle {
    pub id: String,
    pub name: String,
    pub connected: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPrefs {
    pub standup_reminders: bool,
    pub task_deadlines: bool,
    pub happiness_pulse: bool,
    pub weekly_reports: bool,
    pub slack_integration: bool,
    pub email_digest: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            standup_reminders: true,
            task_deadlines: true,
            happiness_pulse: true,
            weekly_reports: false,
            slack_integration: true,
            email_digest: true,
        }
    }
}

impl NotificationPrefs {
    /// Set a preference by its camelCase key.
    pub fn set(&mut self, key: &str, value: bool) -> WorkbenchResult<()> {
        let slot = match key {
            "standupReminders" => &mut self.standup_reminders,
            "taskDeadlines" => &mut self.task_deadlines,
            "happinessPulse" => &mut self.happiness_pulse,
            "weeklyReports" => &mut self.weekly_reports,
            "slackIntegration" => &mut self.slack_integration,
            "emailDigest" => &mut self.email_digest,
            other => {
                return Err(WorkbenchError::validation(format!(
                    "Unknown notification preference: {}",
                    other
                )))
            }
        };
        *slot = value;
        Ok(())
    }
}

/// Settings screen state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSettings {
    pub members: Vec<RosterMember>,
    pub integrations: Vec<IntegrationToggle>,
    pub notifications: NotificationPrefs,
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamSettings {
    pub fn new() -> Self {
        let toggle = |id: &str, name: &str, connected: bool, description: &str, last: Option<&str>| {
            IntegrationToggle {
                id: id.to_string(),
                name: name.to_string(),
                connected,
                description: description.to_string(),
                last_sync: last.map(str::to_string),
            }
        };

        Self {
            members: vec![
                RosterMember::sample("1", "Sarah Chen", "sarah@company.com", "CS Manager", "👩‍💼", &["admin", "analytics", "integrations"]),
                RosterMember::sample("2", "Mike Rodriguez", "mike@company.com", "CS Specialist", "👨‍💻", &["tasks", "customers"]),
                RosterMember::sample("3", "Emma Thompson", "emma@company.com", "CS Analyst", "👩‍📊", &["analytics", "reports"]),
            ],
            integrations: vec![
                toggle("salesforce", "Salesforce", true, "CRM data and customer records", Some("2 minutes ago")),
                toggle("hubspot", "HubSpot", false, "Marketing and sales analytics", None),
                toggle("slack", "Slack", true, "Team notifications and updates", Some("5 minutes ago")),
                toggle("calendar", "Google Calendar", false, "Meeting scheduling and reminders", None),
            ],
            notifications: NotificationPrefs::default(),
        }
    }

    pub fn member(&self, id: &str) -> WorkbenchResult<&RosterMember> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| WorkbenchError::MemberNotFound(id.to_string()))
    }

    /// Invite by email. The name is the part before `@`.
    pub fn invite(&mut self, email: &str) -> WorkbenchResult<RosterMember> {
        let email = email.trim();
        if email.is_empty() {
            return Err(WorkbenchError::validation("Email cannot be empty"));
        }

        let name = email.split('@').next().unwrap_or(email).to_string();
        let member = RosterMember {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email: email.to_string(),
            role: DEFAULT_ROLE.to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
            status: AccountStatus::Active,
            permissions: vec!["tasks".to_string()],
        };
        info!(email = %member.email, "Invited team member");
        self.members.push(member.clone());
        Ok(member)
    }

    pub fn update_member(&mut self, id: &str, patch: MemberPatch) -> WorkbenchResult<RosterMember> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| WorkbenchError::MemberNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            member.name = name;
        }
        if let Some(email) = patch.email {
            member.email = email;
        }
        if let Some(role) = patch.role {
            member.role = role;
        }
        if let Some(status) = patch.status {
            member.status = status;
        }
        if let Some(permissions) = patch.permissions {
            member.permissions = permissions;
        }
        Ok(member.clone())
    }

    pub fn remove_member(&mut self, id: &str) -> WorkbenchResult<RosterMember> {
        let index = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| WorkbenchError::MemberNotFound(id.to_string()))?;
        let removed = self.members.remove(index);
        info!(member = %removed.name, "Removed team member");
        Ok(removed)
    }

    /// Flip an integration toggle. Returns the new state.
    pub fn toggle_integration(&mut self, id: &str) -> WorkbenchResult<bool> {
        let toggle = self
            .integrations
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| WorkbenchError::IntegrationNotFound(id.to_string()))?;
        toggle.connected = !toggle.connected;
        Ok(toggle.connected)
    }

    /// Copy the roster into the store's team member list.
    pub async fn publish_team(&self, store: &AppStore) -> WorkbenchResult<()> {
        let members = self.members.iter().map(RosterMember::to_team_member).collect();
        store.set_team_members(members).await
    }
}

// ── Company profile ──

pub async fn set_company_description(store: &AppStore, text: &str) -> WorkbenchResult<()> {
    store
        .set_onboarding(OnboardingPatch {
            company_description: Some(text.to_string()),
            ..Default::default()
        })
        .await
}

pub async fn set_team_size(store: &AppStore, text: &str) -> WorkbenchResult<()> {
    store
        .set_onboarding(OnboardingPatch {
            team_size: Some(text.to_string()),
            ..Default::default()
        })
        .await
}

/// Append an empty goal for editing.
pub async fn add_goal(store: &AppStore) -> WorkbenchResult<Vec<String>> {
    let mut goals = store.onboarding().quarterly_goals;
    goals.push(String::new());
    save_goals(store, goals).await
}

pub async fn set_goal(store: &AppStore, index: usize, text: &str) -> WorkbenchResult<Vec<String>> {
    let mut goals = store.onboarding().quarterly_goals;
    let slot = goals
        .get_mut(index)
        .ok_or_else(|| WorkbenchError::validation(format!("No goal at index {}", index)))?;
    *slot = text.to_string();
    save_goals(store, goals).await
}

pub async fn remove_goal(store: &AppStore, index: usize) -> WorkbenchResult<Vec<String>> {
    let mut goals = store.onboarding().quarterly_goals;
    if index >= goals.len() {
        return Err(WorkbenchError::validation(format!("No goal at index {}", index)));
    }
    goals.remove(index);
    save_goals(store, goals).await
}

async fn save_goals(store: &AppStore, goals: Vec<String>) -> WorkbenchResult<Vec<String>> {
    store
        .set_onboarding(OnboardingPatch {
            quarterly_goals: Some(goals.clone()),
            ..Default::default()
        })
        .await?;
    Ok(goals)
}

pub async fn remove_system(store: &AppStore, index: usize) -> WorkbenchResult<Vec<String>> {
    let mut systems = store.onboarding().systems;
    if index >= systems.len() {
        return Err(WorkbenchError::validation(format!("No system at index {}", index)));
    }
    systems.remove(index);
    store
        .set_onboarding(OnboardingPatch {
            systems: Some(systems.clone()),
            ..Default::default()
        })
        .await?;
    Ok(systems)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_uses_email_local_part() {
        let mut settings = TeamSettings::new();
        let member = settings.invite("jordan@company.com").unwrap();
        assert_eq!(member.name, "jordan");
        assert_eq!(member.role, DEFAULT_ROLE);
        assert_eq!(member.permissions, vec!["tasks"]);
        assert_eq!(member.status, AccountStatus::Active);
        assert_eq!(settings.members.len(), 4);
        assert!(settings.invite("  ").is_err());
    }

    #[test]
    fn test_edit_and_remove_member() {
        let mut settings = TeamSettings::new();
        let updated = settings
            .update_member(
                "2",
                MemberPatch {
                    role: Some("Senior CSM".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.role, "Senior CSM");
        assert_eq!(updated.name, "Mike Rodriguez");

        settings.remove_member("2").unwrap();
        assert!(settings.member("2").is_err());
        assert!(matches!(
            settings.remove_member("2"),
            Err(WorkbenchError::MemberNotFound(_))
        ));
    }

    #[test]
    fn test_toggle_and_notifications() {
        let mut settings = TeamSettings::new();
        assert!(settings.toggle_integration("calendar").unwrap());
        assert!(!settings.toggle_integration("calendar").unwrap());

        assert!(!settings.notifications.weekly_reports);
        settings.notifications.set("weeklyReports", true).unwrap();
        assert!(settings.notifications.weekly_reports);
        assert!(settings.notifications.set("smoke", true).is_err());
    }

    #[tokio::test]
    async fn test_publish_team_to_store() {
        let store = AppStore::in_memory();
        let mut settings = TeamSettings::new();
        settings
            .update_member(
                "3",
                MemberPatch {
                    status: Some(AccountStatus::Inactive),
                    ..Default::default()
                },
            )
            .unwrap();
        settings.publish_team(&store).await.unwrap();

        let team = store.team_members();
        assert_eq!(team.len(), 3);
        assert_eq!(team[2].status, MemberStatus::Offline);
    }

    #[tokio::test]
    async fn test_goal_editing() {
        let store = AppStore::in_memory();
        add_goal(&store).await.unwrap();
        set_goal(&store, 0, "Raise NDR to 120%").await.unwrap();
        add_goal(&store).await.unwrap();
        let goals = remove_goal(&store, 1).await.unwrap();
        assert_eq!(goals, vec!["Raise NDR to 120%"]);
        assert_eq!(store.onboarding().quarterly_goals, goals);
        assert!(set_goal(&store, 3, "x").await.is_err());

        set_company_description(&store, "Acme").await.unwrap();
        assert_eq!(store.onboarding().company_description, "Acme");
    }
}
