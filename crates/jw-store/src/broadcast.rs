//! Broadcast channel for real-time updates.
//!
//! Uses a tokio broadcast channel for in-process fan-out to WebSocket
//! clients and other subscribers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Change notifications emitted by the workbench store and screens.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum WorkbenchEvent {
    /// A task was added.
    TaskAdded { task_id: String },
    /// A task's fields were updated.
    TaskUpdated { task_id: String, status: String },
    /// The whole task list was replaced.
    TasksReplaced { count: usize },
    /// The current view changed.
    ViewChanged { view: String },
    /// Onboarding answers changed.
    OnboardingUpdated { is_complete: bool },
    /// The celebration flag flipped.
    ConfettiChanged { active: bool },
    /// Stand-up mode flipped.
    StandupModeChanged { active: bool },
    /// A happiness pulse was recorded.
    PulseSubmitted { user_id: String, month: String },
    /// The whole pulse history was replaced.
    PulsesReplaced { count: usize },
    /// The team roster changed.
    TeamChanged { count: usize },
    /// The signed-in user changed.
    UserChanged { user_id: Option<String> },
    /// A realtime chat entry was appended.
    ChatMessage { user_name: String, content: String },
}

/// Type alias for the broadcast sender.
pub type BroadcastSender = broadcast::Sender<WorkbenchEvent>;

/// Type alias for the broadcast receiver.
pub type BroadcastReceiver = broadcast::Receiver<WorkbenchEvent>;

/// Create a new broadcast channel with default capacity.
pub fn create_broadcast_channel() -> BroadcastSender {
    let (tx, _rx) = broadcast::channel(100);
    tx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_string(&WorkbenchEvent::TaskUpdated {
            task_id: "t1".into(),
            status: "done".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"TaskUpdated","data":{"task_id":"t1","status":"done"}}"#);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let tx = create_broadcast_channel();
        let mut rx = tx.subscribe();
        tx.send(WorkbenchEvent::ConfettiChanged { active: true }).unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            WorkbenchEvent::ConfettiChanged { active: true }
        );
    }
}
