//! Realtime collaboration room.
//!
//! The call itself is simulated. Chat goes through a [`RealtimeChannel`]:
//! joining subscribes with presence metadata, sending publishes a `chat`
//! event, and incoming `chat` events from other users land in the log.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::error::{WorkbenchError, WorkbenchResult};

/// Channel every voice session uses.
pub const VOICE_CHANNEL: &str = "voice-session";
pub const CURRENT_USER: &str = "current-user";
pub const SESSION_TITLE: &str = "Daily Stand-up";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Away,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceMetadata {
    pub display_name: String,
    pub status: PresenceStatus,
    pub is_muted: bool,
    pub has_video: bool,
}

/// What a subscriber announces when joining a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    pub user_id: String,
    pub metadata: PresenceMetadata,
}

/// An event on a channel: `{type, userId, metadata, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PresenceMetadata>,
    pub data: serde_json::Value,
}

/// Pub/sub channel used by the collaboration room.
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    fn name(&self) -> &str;

    /// Join with presence metadata and receive every later message.
    async fn subscribe(&self, presence: Presence) -> WorkbenchResult<broadcast::Receiver<ChannelMessage>>;

    async fn publish(&self, message: ChannelMessage) -> WorkbenchResult<()>;

    /// Users currently subscribed.
    fn presence(&self) -> Vec<Presence>;

    async fn unsubscribe(&self, user_id: &str) -> WorkbenchResult<()>;
}

/// In-process channel over a tokio broadcast.
pub struct LocalChannel {
    name: String,
    tx: broadcast::Sender<ChannelMessage>,
    members: Mutex<Vec<Presence>>,
}

impl LocalChannel {
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            name: name.into(),
            tx,
            members: Mutex::new(Vec::new()),
        }
    }

    fn members(&self) -> std::sync::MutexGuard<'_, Vec<Presence>> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RealtimeChannel for LocalChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn subscribe(&self, presence: Presence) -> WorkbenchResult<broadcast::Receiver<ChannelMessage>> {
        let rx = self.tx.subscribe();
        let mut members = self.members();
        members.retain(|p| p.user_id != presence.user_id);
        debug!(channel = %self.name, user_id = %presence.user_id, "Subscribed");
        members.push(presence);
        info!(channel = %self.name, participants = members.len(), "Participants updated");
        Ok(rx)
    }

    async fn publish(&self, message: ChannelMessage) -> WorkbenchResult<()> {
        // Nobody listening is not an error.
        let _ = self.tx.send(message);
        Ok(())
    }

    fn presence(&self) -> Vec<Presence> {
        self.members().clone()
    }

    async fn unsubscribe(&self, user_id: &str) -> WorkbenchResult<()> {
        self.members().retain(|p| p.user_id != user_id);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub status: PresenceStatus,
    pub is_speaking: bool,
    pub is_muted: bool,
    pub has_video: bool,
    pub is_hand_raised: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomMessageKind {
    Text,
    System,
    Reaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessage {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: RoomMessageKind,
}

impl RoomMessage {
    fn new(user_id: &str, user_name: &str, content: &str, kind: RoomMessageKind, at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            content: content.to_string(),
            timestamp: at,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSession {
    pub id: String,
    pub title: String,
    pub is_active: bool,
    pub started_at: DateTime<Utc>,
    pub duration: u64,
}

pub fn sample_participants(now: DateTime<Utc>) -> Vec<Participant> {
    let participant = |id: &str, name: &str, avatar: &str, speaking: bool, muted: bool, video: bool, hand: bool| {
        Participant {
            id: id.to_string(),
            name: name.to_string(),
            avatar: avatar.to_string(),
            status: PresenceStatus::Online,
            is_speaking: speaking,
            is_muted: muted,
            has_video: video,
            is_hand_raised: hand,
            joined_at: now,
        }
    };
    vec![
        participant("1", "Sarah Chen", "👩‍💼", false, false, true, false),
        participant("2", "Mike Rodriguez", "👨‍💻", true, false, false, false),
        participant("3", "Emma Thompson", "👩‍📊", false, true, true, true),
    ]
}

pub fn sample_messages(now: DateTime<Utc>) -> Vec<RoomMessage> {
    let ago = |secs: i64| now - ChronoDuration::seconds(secs);
    vec![
        RoomMessage::new("1", "Sarah Chen", "Good morning everyone! Ready for our stand-up?", RoomMessageKind::Text, ago(300)),
        RoomMessage::new("system", "System", "Mike Rodriguez joined the call", RoomMessageKind::System, ago(240)),
        RoomMessage::new("2", "Mike Rodriguez", "Hey team! Just finished the customer health score updates", RoomMessageKind::Text, ago(180)),
        RoomMessage::new("3", "Emma Thompson", "👍", RoomMessageKind::Reaction, ago(120)),
    ]
}

/// `m:ss` call timer.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Serializable view of the room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub is_in_call: bool,
    pub is_muted: bool,
    pub has_video: bool,
    pub is_hand_raised: bool,
    pub participants: Vec<Participant>,
    pub messages: Vec<RoomMessage>,
    pub session: Option<VoiceSession>,
}

/// The voice collaboration screen.
pub struct CollaborationRoom {
    channel: Arc<dyn RealtimeChannel>,
    incoming: Option<broadcast::Receiver<ChannelMessage>>,
    join_delay: Duration,
    user_id: String,
    display_name: String,
    is_muted: bool,
    has_video: bool,
    is_hand_raised: bool,
    participants: Vec<Participant>,
    messages: Vec<RoomMessage>,
    session: Option<VoiceSession>,
}

impl CollaborationRoom {
    pub fn new(channel: Arc<dyn RealtimeChannel>, join_delay: Duration) -> Self {
        Self {
            channel,
            incoming: None,
            join_delay,
            user_id: CURRENT_USER.to_string(),
            display_name: "You".to_string(),
            is_muted: false,
            has_video: false,
            is_hand_raised: false,
            participants: Vec::new(),
            messages: Vec::new(),
            session: None,
        }
    }

    /// Use a specific identity instead of the default `current-user`/`You`.
    pub fn with_identity(mut self, user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self.display_name = display_name.into();
        self
    }

    pub fn is_in_call(&self) -> bool {
        self.incoming.is_some()
    }

    pub fn messages(&self) -> &[RoomMessage] {
        &self.messages
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn session(&self) -> Option<&VoiceSession> {
        self.session.as_ref()
    }

    fn metadata(&self) -> PresenceMetadata {
        PresenceMetadata {
            display_name: self.display_name.clone(),
            status: PresenceStatus::Online,
            is_muted: self.is_muted,
            has_video: self.has_video,
        }
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            is_in_call: self.is_in_call(),
            is_muted: self.is_muted,
            has_video: self.has_video,
            is_hand_raised: self.is_hand_raised,
            participants: self.participants.clone(),
            messages: self.messages.clone(),
            session: self.session.clone(),
        }
    }

    /// Connect, subscribe to the voice channel and load the sample room.
    /// Joining while already in the call is a no-op.
    pub async fn join(&mut self) -> WorkbenchResult<()> {
        if self.is_in_call() {
            return Ok(());
        }

        tokio::time::sleep(self.join_delay).await;

        let presence = Presence {
            user_id: self.user_id.clone(),
            metadata: self.metadata(),
        };
        let rx = match self.channel.subscribe(presence).await {
            Ok(rx) => rx,
            Err(e) => {
                error!(error = %e, "Failed to join call");
                return Err(e);
            }
        };

        let now = Utc::now();
        self.incoming = Some(rx);
        self.participants = sample_participants(now);
        self.messages = sample_messages(now);
        self.session = Some(VoiceSession {
            id: "session-1".to_string(),
            title: SESSION_TITLE.to_string(),
            is_active: true,
            started_at: now,
            duration: 0,
        });
        info!(channel = %self.channel.name(), "Joined call");
        Ok(())
    }

    /// Append a chat message locally and publish it. A failed publish is
    /// logged; the local entry stays.
    pub async fn send_message(&mut self, content: &str) -> WorkbenchResult<RoomMessage> {
        if !self.is_in_call() {
            return Err(WorkbenchError::NotInCall);
        }
        if content.trim().is_empty() {
            return Err(WorkbenchError::validation("Message cannot be empty"));
        }

        let message = RoomMessage::new(
            &self.user_id,
            &self.display_name,
            content,
            RoomMessageKind::Text,
            Utc::now(),
        );
        self.messages.push(message.clone());

        let event = ChannelMessage {
            kind: "chat".to_string(),
            user_id: self.user_id.clone(),
            metadata: Some(self.metadata()),
            data: serde_json::json!({ "content": content }),
        };
        if let Err(e) = self.channel.publish(event).await {
            error!(error = %e, "Failed to send message");
        }
        Ok(message)
    }

    /// Pull pending channel events into the chat log. Returns the new
    /// entries. Our own echoes and non-chat events are skipped.
    pub fn receive_pending(&mut self) -> Vec<RoomMessage> {
        let Some(rx) = self.incoming.as_mut() else {
            return Vec::new();
        };

        let mut received = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(message) => {
                    if message.kind != "chat" || message.user_id == self.user_id {
                        continue;
                    }
                    let user_name = message
                        .metadata
                        .as_ref()
                        .map(|m| m.display_name.as_str())
                        .unwrap_or("Unknown");
                    let content = message
                        .data
                        .get("content")
                        .and_then(|c| c.as_str())
                        .unwrap_or_default();
                    received.push(RoomMessage::new(
                        &message.user_id,
                        user_name,
                        content,
                        RoomMessageKind::Text,
                        Utc::now(),
                    ));
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Chat receiver lagged");
                }
                Err(_) => break,
            }
        }
        self.messages.extend(received.iter().cloned());
        received
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.is_muted = !self.is_muted;
        self.is_muted
    }

    pub fn toggle_video(&mut self) -> bool {
        self.has_video = !self.has_video;
        self.has_video
    }

    pub fn toggle_hand(&mut self) -> bool {
        self.is_hand_raised = !self.is_hand_raised;
        self.is_hand_raised
    }

    /// Leave the call and reset the room.
    pub async fn leave(&mut self) -> WorkbenchResult<()> {
        if self.incoming.take().is_some() {
            self.channel.unsubscribe(&self.user_id).await?;
            info!(channel = %self.channel.name(), "Left call");
        }
        self.is_muted = false;
        self.has_video = false;
        self.is_hand_raised = false;
        self.participants.clear();
        self.messages.clear();
        self.session = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(channel: Arc<LocalChannel>) -> CollaborationRoom {
        CollaborationRoom::new(channel, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_join_loads_sample_room() {
        let channel = Arc::new(LocalChannel::new(VOICE_CHANNEL));
        let mut room = room(channel.clone());
        room.join().await.unwrap();

        assert!(room.is_in_call());
        assert_eq!(room.participants().len(), 3);
        assert_eq!(room.messages().len(), 4);
        assert_eq!(room.session().unwrap().title, SESSION_TITLE);

        let presence = channel.presence();
        assert_eq!(presence.len(), 1);
        assert_eq!(presence[0].user_id, CURRENT_USER);
        assert_eq!(presence[0].metadata.display_name, "You");
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_waits_for_connection() {
        let channel = Arc::new(LocalChannel::new(VOICE_CHANNEL));
        let mut room = CollaborationRoom::new(channel, Duration::from_millis(2000));
        let start = tokio::time::Instant::now();
        room.join().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_send_requires_call() {
        let mut room = room(Arc::new(LocalChannel::new(VOICE_CHANNEL)));
        assert!(matches!(
            room.send_message("hi").await,
            Err(WorkbenchError::NotInCall)
        ));
    }

    #[tokio::test]
    async fn test_chat_between_two_rooms() {
        let channel = Arc::new(LocalChannel::new(VOICE_CHANNEL));
        let mut me = room(channel.clone());
        let mut sarah = room(channel.clone()).with_identity("1", "Sarah Chen");
        me.join().await.unwrap();
        sarah.join().await.unwrap();

        me.send_message("Blocked on SFDC access").await.unwrap();
        assert_eq!(me.messages().len(), 5);

        // Own echo is ignored.
        assert!(me.receive_pending().is_empty());

        let received = sarah.receive_pending();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].user_name, "You");
        assert_eq!(received[0].content, "Blocked on SFDC access");
        assert_eq!(sarah.messages().len(), 5);
    }

    #[tokio::test]
    async fn test_non_chat_events_ignored() {
        let channel = Arc::new(LocalChannel::new(VOICE_CHANNEL));
        let mut me = room(channel.clone());
        me.join().await.unwrap();
        channel
            .publish(ChannelMessage {
                kind: "reaction".into(),
                user_id: "2".into(),
                metadata: None,
                data: serde_json::json!({}),
            })
            .await
            .unwrap();
        channel
            .publish(ChannelMessage {
                kind: "chat".into(),
                user_id: "2".into(),
                metadata: None,
                data: serde_json::json!({ "content": "hello" }),
            })
            .await
            .unwrap();

        let received = me.receive_pending();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].user_name, "Unknown");
    }

    #[tokio::test]
    async fn test_leave_resets_everything() {
        let channel = Arc::new(LocalChannel::new(VOICE_CHANNEL));
        let mut room = room(channel.clone());
        room.join().await.unwrap();
        assert!(room.toggle_mute());
        assert!(room.toggle_video());
        assert!(room.toggle_hand());

        room.leave().await.unwrap();
        let snapshot = room.snapshot();
        assert!(!snapshot.is_in_call);
        assert!(!snapshot.is_muted && !snapshot.has_video && !snapshot.is_hand_raised);
        assert!(snapshot.participants.is_empty());
        assert!(snapshot.messages.is_empty());
        assert!(snapshot.session.is_none());
        assert!(channel.presence().is_empty());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3600), "60:00");
    }
}
