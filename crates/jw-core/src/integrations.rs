//! Integration catalog.
//!
//! Connecting, syncing and disconnecting are simulated: fixed delays and
//! log lines stand in for OAuth redirects and API calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::info;

use crate::error::{WorkbenchError, WorkbenchResult};

/// `last_sync` label after a successful connect or sync.
pub const JUST_NOW: &str = "Just now";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Crm,
    Analytics,
    Communication,
    Productivity,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crm => "crm",
            Self::Analytics => "analytics",
            Self::Communication => "communication",
            Self::Productivity => "productivity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    Connected,
    Disconnected,
    Error,
    Syncing,
}

impl IntegrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
            Self::Syncing => "syncing",
        }
    }
}

impl fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub status: IntegrationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_url: Option<String>,
    #[serde(default)]
    pub api_key_required: bool,
    #[serde(default)]
    pub oauth_supported: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncFrequency {
    Realtime,
    #[default]
    Hourly,
    Daily,
}

/// Per-integration settings from the configure dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationConfig {
    pub api_key: Option<String>,
    pub webhook_url: Option<String>,
    pub sync_frequency: SyncFrequency,
    pub enabled_features: Vec<String>,
}

struct Entry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: Category,
    status: IntegrationStatus,
    last_sync: Option<&'static str>,
    features: [&'static str; 4],
    setup_url: Option<&'static str>,
    api_key: bool,
}

const CATALOG: [Entry; 8] = [
    Entry {
        id: "salesforce",
        name: "Salesforce",
        description: "Sync customer data, opportunities, and account health scores",
        category: Category::Crm,
        status: IntegrationStatus::Connected,
        last_sync: Some("2 minutes ago"),
        features: ["Customer Records", "Opportunity Pipeline", "Account Health", "Activity Tracking"],
        setup_url: Some("https://login.salesforce.com/services/oauth2/authorize"),
        api_key: false,
    },
    Entry {
        id: "hubspot",
        name: "HubSpot",
        description: "Import contacts, deals, and marketing analytics",
        category: Category::Crm,
        status: IntegrationStatus::Disconnected,
        last_sync: None,
        features: ["Contact Management", "Deal Pipeline", "Marketing Analytics", "Email Tracking"],
        setup_url: Some("https://app.hubspot.com/oauth/authorize"),
        api_key: false,
    },
    Entry {
        id: "gainsight",
        name: "Gainsight",
        description: "Customer success metrics and health scores",
        category: Category::Analytics,
        status: IntegrationStatus::Disconnected,
        last_sync: None,
        features: ["Health Scores", "Success Metrics", "Risk Alerts", "Renewal Tracking"],
        setup_url: None,
        api_key: true,
    },
    Entry {
        id: "slack",
        name: "Slack",
        description: "Send notifications and updates to team channels",
        category: Category::Communication,
        status: IntegrationStatus::Connected,
        last_sync: Some("5 minutes ago"),
        features: ["Channel Notifications", "Stand-up Reminders", "Task Updates", "Alert Routing"],
        setup_url: Some("https://slack.com/oauth/v2/authorize"),
        api_key: false,
    },
    Entry {
        id: "zoom",
        name: "Zoom",
        description: "Schedule and manage customer meetings",
        category: Category::Communication,
        status: IntegrationStatus::Disconnected,
        last_sync: None,
        features: ["Meeting Scheduling", "Recording Access", "Participant Analytics", "Calendar Sync"],
        setup_url: None,
        api_key: false,
    },
    Entry {
        id: "tableau",
        name: "Tableau",
        description: "Advanced analytics and custom dashboards",
        category: Category::Analytics,
        status: IntegrationStatus::Error,
        last_sync: None,
        features: ["Custom Dashboards", "Data Visualization", "Report Automation", "KPI Tracking"],
        setup_url: None,
        api_key: true,
    },
    Entry {
        id: "jira",
        name: "Jira",
        description: "Track customer issues and feature requests",
        category: Category::Productivity,
        status: IntegrationStatus::Disconnected,
        last_sync: None,
        features: ["Issue Tracking", "Feature Requests", "Bug Reports", "Sprint Planning"],
        setup_url: None,
        api_key: false,
    },
    Entry {
        id: "gmail",
        name: "Gmail",
        description: "Email integration for customer communications",
        category: Category::Communication,
        status: IntegrationStatus::Disconnected,
        last_sync: None,
        features: ["Email Sync", "Template Management", "Auto-responses", "Thread Tracking"],
        setup_url: None,
        api_key: false,
    },
];

/// The eight sample integrations in display order.
pub fn catalog() -> Vec<Integration> {
    CATALOG
        .iter()
        .map(|e| Integration {
            id: e.id.to_string(),
            name: e.name.to_string(),
            description: e.description.to_string(),
            category: e.category,
            status: e.status,
            last_sync: e.last_sync.map(str::to_string),
            features: e.features.iter().map(|f| f.to_string()).collect(),
            setup_url: e.setup_url.map(str::to_string),
            api_key_required: e.api_key,
            oauth_supported: !e.api_key,
        })
        .collect()
}

/// Result of pressing "connect".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectOutcome {
    Connected,
    /// The integration needs an API key through [`IntegrationHub::configure`].
    ApiKeyRequired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub connected: usize,
    pub disconnected: usize,
    pub error: usize,
    pub syncing: usize,
    pub total: usize,
}

/// Integration screen state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationHub {
    integrations: Vec<Integration>,
    configs: BTreeMap<String, IntegrationConfig>,
    #[serde(skip)]
    connect_delay: Duration,
    #[serde(skip)]
    sync_delay: Duration,
}

impl IntegrationHub {
    pub fn new(connect_delay: Duration, sync_delay: Duration) -> Self {
        Self {
            integrations: catalog(),
            configs: BTreeMap::new(),
            connect_delay,
            sync_delay,
        }
    }

    pub fn integrations(&self) -> &[Integration] {
        &self.integrations
    }

    pub fn get(&self, id: &str) -> WorkbenchResult<&Integration> {
        self.integrations
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| WorkbenchError::IntegrationNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> WorkbenchResult<&mut Integration> {
        self.integrations
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| WorkbenchError::IntegrationNotFound(id.to_string()))
    }

    pub fn config(&self, id: &str) -> Option<&IntegrationConfig> {
        self.configs.get(id)
    }

    pub fn by_category(&self, category: Category) -> Vec<&Integration> {
        self.integrations
            .iter()
            .filter(|i| i.category == category)
            .collect()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts {
            total: self.integrations.len(),
            ..Default::default()
        };
        for integration in &self.integrations {
            match integration.status {
                IntegrationStatus::Connected => counts.connected += 1,
                IntegrationStatus::Disconnected => counts.disconnected += 1,
                IntegrationStatus::Error => counts.error += 1,
                IntegrationStatus::Syncing => counts.syncing += 1,
            }
        }
        counts
    }

    /// Start connecting. OAuth integrations connect after the simulated
    /// redirect; API-key integrations ask for configuration instead.
    pub async fn connect(&mut self, id: &str) -> WorkbenchResult<ConnectOutcome> {
        let integration = self.get(id)?;
        if integration.api_key_required {
            info!(integration = %id, "API key required");
            return Ok(ConnectOutcome::ApiKeyRequired);
        }

        info!(integration = %integration.name, "Starting OAuth flow");
        tokio::time::sleep(self.connect_delay).await;

        let integration = self.get_mut(id)?;
        integration.status = IntegrationStatus::Connected;
        integration.last_sync = Some(JUST_NOW.to_string());
        info!(integration = %id, "Connected");
        Ok(ConnectOutcome::Connected)
    }

    /// Save settings from the configure dialog. API-key integrations
    /// become connected once a key is present.
    pub fn configure(&mut self, id: &str, config: IntegrationConfig) -> WorkbenchResult<()> {
        let integration = self.get_mut(id)?;
        let has_key = config
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());

        if integration.api_key_required {
            if !has_key {
                return Err(WorkbenchError::validation(format!(
                    "{} requires an API key",
                    integration.name
                )));
            }
            integration.status = IntegrationStatus::Connected;
            integration.last_sync = Some(JUST_NOW.to_string());
        }

        info!(integration = %id, frequency = ?config.sync_frequency, "Integration configured");
        self.configs.insert(id.to_string(), config);
        Ok(())
    }

    pub fn disconnect(&mut self, id: &str) -> WorkbenchResult<()> {
        let integration = self.get_mut(id)?;
        info!(integration = %id, "Disconnecting");
        integration.status = IntegrationStatus::Disconnected;
        integration.last_sync = None;
        self.configs.remove(id);
        Ok(())
    }

    /// Simulated sync. A connected integration gets a fresh `last_sync`.
    pub async fn sync(&mut self, id: &str) -> WorkbenchResult<IntegrationStatus> {
        let previous = {
            let integration = self.get_mut(id)?;
            let previous = integration.status;
            integration.status = IntegrationStatus::Syncing;
            previous
        };
        info!(integration = %id, "Syncing");
        tokio::time::sleep(self.sync_delay).await;

        let integration = self.get_mut(id)?;
        integration.status = previous;
        if previous == IntegrationStatus::Connected {
            integration.last_sync = Some(JUST_NOW.to_string());
        }
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> IntegrationHub {
        IntegrationHub::new(Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn test_catalog_counts() {
        let hub = hub();
        let counts = hub.status_counts();
        assert_eq!(counts.total, 8);
        assert_eq!(counts.connected, 2);
        assert_eq!(counts.error, 1);
        assert_eq!(counts.disconnected, 5);
        assert_eq!(hub.by_category(Category::Communication).len(), 3);
        assert!(hub.integrations().iter().all(|i| i.features.len() == 4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oauth_connect_waits_then_connects() {
        let mut hub = IntegrationHub::new(Duration::from_millis(2000), Duration::ZERO);
        let start = tokio::time::Instant::now();
        let outcome = hub.connect("hubspot").await.unwrap();
        assert_eq!(outcome, ConnectOutcome::Connected);
        assert!(start.elapsed() >= Duration::from_millis(2000));

        let hubspot = hub.get("hubspot").unwrap();
        assert_eq!(hubspot.status, IntegrationStatus::Connected);
        assert_eq!(hubspot.last_sync.as_deref(), Some(JUST_NOW));
    }

    #[tokio::test]
    async fn test_api_key_integration_needs_config() {
        let mut hub = hub();
        assert_eq!(
            hub.connect("gainsight").await.unwrap(),
            ConnectOutcome::ApiKeyRequired
        );
        assert_eq!(
            hub.get("gainsight").unwrap().status,
            IntegrationStatus::Disconnected
        );

        assert!(hub.configure("gainsight", IntegrationConfig::default()).is_err());
        hub.configure(
            "gainsight",
            IntegrationConfig {
                api_key: Some("gs-123".into()),
                sync_frequency: SyncFrequency::Daily,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            hub.get("gainsight").unwrap().status,
            IntegrationStatus::Connected
        );
    }

    #[tokio::test]
    async fn test_disconnect_drops_config() {
        let mut hub = hub();
        hub.configure("slack", IntegrationConfig::default()).unwrap();
        assert!(hub.config("slack").is_some());
        hub.disconnect("slack").unwrap();
        assert!(hub.config("slack").is_none());
        assert_eq!(hub.get("slack").unwrap().status, IntegrationStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_sync_restores_status() {
        let mut hub = hub();
        assert_eq!(hub.sync("salesforce").await.unwrap(), IntegrationStatus::Connected);
        assert_eq!(
            hub.get("salesforce").unwrap().last_sync.as_deref(),
            Some(JUST_NOW)
        );
        assert_eq!(hub.sync("tableau").await.unwrap(), IntegrationStatus::Error);
    }

    #[tokio::test]
    async fn test_unknown_integration() {
        let mut hub = hub();
        assert!(matches!(
            hub.connect("myspace").await,
            Err(WorkbenchError::IntegrationNotFound(_))
        ));
    }
}
