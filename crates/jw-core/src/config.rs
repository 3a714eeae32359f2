//! Workbench configuration.
//!
//! Read from `<project>/.jungwell/config.toml` when present, then overridden
//! by `JW_*` environment variables. Every field has a default so an empty or
//! missing file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{WorkbenchError, WorkbenchResult};

/// Directory holding workbench files inside a project.
pub const WORKBENCH_DIR: &str = ".jungwell";

/// Config file name inside [`WORKBENCH_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    pub storage: StorageConfig,
    pub ai: AiConfig,
    pub server: ServerConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend URL. `None` means `<project>/.jungwell/storage`.
    pub url: Option<String>,
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: None,
            namespace: jw_store::DEFAULT_NAMESPACE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: crate::ai::DEFAULT_AI_URL.to_string(),
            api_key: None,
            model: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3040,
        }
    }
}

/// Fixed delays that stand in for asynchronous work, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub confetti_ms: u64,
    pub thinking_ms: u64,
    pub standup_advance_ms: u64,
    pub connect_ms: u64,
    pub sync_ms: u64,
    pub refresh_ms: u64,
    pub join_call_ms: u64,
    pub easter_egg_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            confetti_ms: 2000,
            thinking_ms: 1500,
            standup_advance_ms: 1000,
            connect_ms: 2000,
            sync_ms: 1000,
            refresh_ms: 2000,
            join_call_ms: 2000,
            easter_egg_ms: 3000,
        }
    }
}

impl TimingConfig {
    /// All delays set to zero, for scripted and test use.
    pub fn instant() -> Self {
        Self {
            confetti_ms: 0,
            thinking_ms: 0,
            standup_advance_ms: 0,
            connect_ms: 0,
            sync_ms: 0,
            refresh_ms: 0,
            join_call_ms: 0,
            easter_egg_ms: 0,
        }
    }

    pub fn confetti(&self) -> Duration {
        Duration::from_millis(self.confetti_ms)
    }

    pub fn thinking(&self) -> Duration {
        Duration::from_millis(self.thinking_ms)
    }

    pub fn standup_advance(&self) -> Duration {
        Duration::from_millis(self.standup_advance_ms)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn sync(&self) -> Duration {
        Duration::from_millis(self.sync_ms)
    }

    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn join_call(&self) -> Duration {
        Duration::from_millis(self.join_call_ms)
    }

    pub fn easter_egg(&self) -> Duration {
        Duration::from_millis(self.easter_egg_ms)
    }
}

impl WorkbenchConfig {
    /// Load configuration for a project directory.
    pub fn load(project_dir: &Path) -> WorkbenchResult<Self> {
        let path = project_dir.join(WORKBENCH_DIR).join(CONFIG_FILE);
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            Self::from_toml(&raw)?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(raw: &str) -> WorkbenchResult<Self> {
        toml::from_str(raw).map_err(|e| WorkbenchError::Config(e.to_string()))
    }

    /// Apply `JW_*` overrides from a variable lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("JW_STORAGE_URL") {
            self.storage.url = Some(url);
        }
        if let Some(ns) = lookup("JW_NAMESPACE") {
            self.storage.namespace = ns;
        }
        if let Some(url) = lookup("JW_AI_URL") {
            self.ai.base_url = url;
        }
        if let Some(key) = lookup("JW_AI_KEY") {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = lookup("JW_AI_MODEL") {
            self.ai.model = Some(model);
        }
    }

    /// Storage URL, defaulting to a directory under the project.
    pub fn storage_url(&self, project_dir: &Path) -> String {
        self.storage.url.clone().unwrap_or_else(|| {
            let dir: PathBuf = project_dir.join(WORKBENCH_DIR).join("storage");
            format!("file://{}", dir.display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkbenchConfig::default();
        assert_eq!(config.storage.namespace, "jungwell-app-storage");
        assert_eq!(config.timing.confetti_ms, 2000);
        assert_eq!(config.timing.thinking_ms, 1500);
        assert_eq!(config.server.port, 3040);
    }

    #[test]
    fn test_partial_toml() {
        let config = WorkbenchConfig::from_toml(
            "[server]\nport = 8080\n\n[timing]\nconfetti_ms = 10\n",
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.timing.confetti_ms, 10);
        assert_eq!(config.timing.sync_ms, 1000);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            WorkbenchConfig::from_toml("server = 3"),
            Err(WorkbenchError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = WorkbenchConfig::default();
        config.apply_env(|key| match key {
            "JW_STORAGE_URL" => Some("memory://".to_string()),
            "JW_AI_KEY" => Some("secret".to_string()),
            _ => None,
        });
        assert_eq!(config.storage.url.as_deref(), Some("memory://"));
        assert_eq!(config.ai.api_key.as_deref(), Some("secret"));
        assert_eq!(config.storage.namespace, "jungwell-app-storage");
    }

    #[test]
    fn test_load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(WORKBENCH_DIR)).unwrap();
        std::fs::write(
            dir.path().join(WORKBENCH_DIR).join(CONFIG_FILE),
            "[storage]\nnamespace = \"custom\"\n",
        )
        .unwrap();
        let config = WorkbenchConfig::load(dir.path()).unwrap();
        assert_eq!(config.storage.namespace, "custom");
    }

    #[test]
    fn test_default_storage_url() {
        let config = WorkbenchConfig::default();
        let url = config.storage_url(Path::new("/tmp/project"));
        assert_eq!(url, "file:///tmp/project/.jungwell/storage");
    }
}
