//! Web server notifier for live updates.
//!
//! The CLI writes straight to storage; this tells a running `jw serve`
//! to reload and push the change to its WebSocket clients.

use std::time::Duration;
use tracing::{debug, warn};

use jw_store::WorkbenchEvent;

/// Default web server URL.
pub const DEFAULT_WEB_URL: &str = "http://127.0.0.1:3040";

/// Notifies the web server of changes via HTTP.
#[derive(Clone)]
pub struct WebNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl WebNotifier {
    /// Uses `JW_WEB_URL` when set, otherwise [`DEFAULT_WEB_URL`].
    pub fn new() -> Self {
        let base_url =
            std::env::var("JW_WEB_URL").unwrap_or_else(|_| DEFAULT_WEB_URL.to_string());
        Self::with_url(&base_url)
    }

    pub fn with_url(base_url: &str) -> Self {
        debug!(base_url = %base_url, "WebNotifier initialized");
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(2))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST the event to `/internal/notify`. Never fails: a server that is
    /// not running is the common case.
    pub async fn notify(&self, event: &WorkbenchEvent) -> bool {
        let url = format!("{}/internal/notify", self.base_url);
        debug!(url = %url, ?event, "Sending notification");

        match self.client.post(&url).json(event).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Notification sent successfully");
                true
            }
            Ok(response) => {
                warn!(status_code = %response.status(), "Notification failed with status");
                false
            }
            Err(e) => {
                debug!(
                    error = %e,
                    url = %url,
                    "Failed to send notification (jw serve may not be running)"
                );
                false
            }
        }
    }

    pub async fn notify_task_updated(&self, task_id: &str, status: &str) -> bool {
        self.notify(&WorkbenchEvent::TaskUpdated {
            task_id: task_id.to_string(),
            status: status.to_string(),
        })
        .await
    }
}

impl Default for WebNotifier {
    fn default() -> Self {
        Self::new()
    }
}
