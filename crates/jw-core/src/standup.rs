//! Stand-up flow.
//!
//! Three phases per teammate, walked through the sample team in order.
//! Recording is simulated: stopping yields a canned transcript and the flow
//! moves on after a short pause.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

use crate::easter_egg::EasterEgg;
use crate::error::{WorkbenchError, WorkbenchResult};
use crate::model::{team::sample_team, TeamMember, View};
use crate::store::AppStore;

pub const CANNED_TRANSCRIPT: &str =
    "Completed customer health score updates and prepared Q4 renewal materials.";

pub const COMPLETION_SUMMARY: &str =
    "Great session! I've logged all updates and identified 2 potential blockers to address.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Yesterday,
    Today,
    Blockers,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Yesterday, Phase::Today, Phase::Blockers];

    pub fn question(&self) -> &'static str {
        match self {
            Self::Yesterday => "What did you accomplish yesterday?",
            Self::Today => "What are you planning to work on today?",
            Self::Blockers => "Do you have any blockers or need help with anything?",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Yesterday => "#3b82f6",
            Self::Today => "#FF4B4B",
            Self::Blockers => "#eab308",
        }
    }

    fn next(&self) -> Option<Phase> {
        match self {
            Self::Yesterday => Some(Self::Today),
            Self::Today => Some(Self::Blockers),
            Self::Blockers => None,
        }
    }
}

/// Where the session stands after a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandupProgress {
    pub member: String,
    pub member_index: usize,
    pub phase: Phase,
    pub question: String,
    pub is_complete: bool,
}

/// One stand-up run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandupSession {
    members: Vec<TeamMember>,
    member_index: usize,
    phase: Phase,
    is_recording: bool,
    /// member id -> phase -> transcript
    responses: BTreeMap<String, BTreeMap<Phase, String>>,
    is_complete: bool,
    #[serde(skip)]
    advance_delay: Duration,
    #[serde(skip)]
    easter_egg: EasterEgg,
}

impl StandupSession {
    pub fn new(advance_delay: Duration, easter_egg_duration: Duration) -> Self {
        Self::with_members(sample_team(), advance_delay, easter_egg_duration)
    }

    pub fn with_members(
        members: Vec<TeamMember>,
        advance_delay: Duration,
        easter_egg_duration: Duration,
    ) -> Self {
        Self {
            is_complete: members.is_empty(),
            members,
            member_index: 0,
            phase: Phase::Yesterday,
            is_recording: false,
            responses: BTreeMap::new(),
            advance_delay,
            easter_egg: EasterEgg::dance(easter_egg_duration),
        }
    }

    pub fn current_member(&self) -> Option<&TeamMember> {
        self.members.get(self.member_index)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    /// "n of m" counter for the header.
    pub fn position_label(&self) -> String {
        format!("{} of {}", self.member_index + 1, self.members.len())
    }

    pub fn response(&self, member_id: &str, phase: Phase) -> Option<&str> {
        self.responses
            .get(member_id)
            .and_then(|by_phase| by_phase.get(&phase))
            .map(String::as_str)
    }

    pub fn progress(&self) -> StandupProgress {
        StandupProgress {
            member: self
                .current_member()
                .map(|m| m.name.clone())
                .unwrap_or_default(),
            member_index: self.member_index,
            phase: self.phase,
            question: self.phase.question().to_string(),
            is_complete: self.is_complete,
        }
    }

    pub fn start_recording(&mut self) -> WorkbenchResult<()> {
        if self.is_complete {
            return Err(WorkbenchError::StandupComplete);
        }
        self.is_recording = true;
        info!(phase = ?self.phase, "Starting voice recording...");
        Ok(())
    }

    /// Stop recording, store the transcript for the current member and
    /// phase, then advance after the configured pause.
    pub async fn stop_recording(&mut self) -> WorkbenchResult<StandupProgress> {
        if self.is_complete {
            return Err(WorkbenchError::StandupComplete);
        }
        self.is_recording = false;

        if let Some(member) = self.current_member() {
            let id = member.id.clone();
            self.responses
                .entry(id)
                .or_default()
                .insert(self.phase, CANNED_TRANSCRIPT.to_string());
        }

        tokio::time::sleep(self.advance_delay).await;
        self.advance()
    }

    /// Skip to the next phase or teammate without recording.
    pub fn advance(&mut self) -> WorkbenchResult<StandupProgress> {
        if self.is_complete {
            return Err(WorkbenchError::StandupComplete);
        }

        match self.phase.next() {
            Some(phase) => self.phase = phase,
            None if self.member_index + 1 < self.members.len() => {
                self.member_index += 1;
                self.phase = Phase::Yesterday;
            }
            None => {
                self.is_complete = true;
                info!(members = self.members.len(), "Stand-up complete");
            }
        }
        Ok(self.progress())
    }

    /// Feed keystrokes to the `/dance` easter egg.
    pub fn press_key(&mut self, key: &str) -> bool {
        self.easter_egg.press(key)
    }

    pub fn easter_egg(&self) -> &EasterEgg {
        &self.easter_egg
    }
}

/// Enter stand-up mode from the dashboard.
pub async fn start(store: &AppStore) -> WorkbenchResult<()> {
    store.set_standup_mode(true);
    store.set_current_view(View::Standup).await
}

/// Leave stand-up mode and go back to the dashboard.
pub async fn finish(store: &AppStore) -> WorkbenchResult<()> {
    store.set_standup_mode(false);
    store.set_current_view(View::Dashboard).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> StandupSession {
        StandupSession::new(Duration::ZERO, Duration::from_secs(3))
    }

    #[tokio::test]
    async fn test_walks_every_member_and_phase() {
        let mut s = session();
        let mut steps = 0;
        while !s.is_complete() {
            s.start_recording().unwrap();
            s.stop_recording().await.unwrap();
            steps += 1;
        }
        assert_eq!(steps, 9);
        for member in sample_team() {
            for phase in Phase::ALL {
                assert_eq!(s.response(&member.id, phase), Some(CANNED_TRANSCRIPT));
            }
        }
        assert!(s.start_recording().is_err());
    }

    #[test]
    fn test_skip_moves_to_next_member() {
        let mut s = session();
        s.advance().unwrap();
        s.advance().unwrap();
        assert_eq!(s.phase(), Phase::Blockers);
        let progress = s.advance().unwrap();
        assert_eq!(progress.member, "Mike Rodriguez");
        assert_eq!(progress.phase, Phase::Yesterday);
        assert_eq!(s.position_label(), "2 of 3");
        assert!(s.response("1", Phase::Yesterday).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_advance_waits() {
        let mut s = StandupSession::new(Duration::from_millis(1000), Duration::from_secs(3));
        let start = tokio::time::Instant::now();
        s.start_recording().unwrap();
        let progress = s.stop_recording().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(progress.phase, Phase::Today);
        assert!(!s.is_recording());
    }

    #[tokio::test]
    async fn test_start_and_finish_toggle_mode() {
        let store = AppStore::in_memory();
        start(&store).await.unwrap();
        assert!(store.is_standup_mode());
        assert_eq!(store.current_view(), View::Standup);

        finish(&store).await.unwrap();
        assert!(!store.is_standup_mode());
        assert_eq!(store.current_view(), View::Dashboard);
    }

    #[tokio::test]
    async fn test_dance_during_standup() {
        let mut s = session();
        assert!(s.press_key("/dance"));
    }
}
