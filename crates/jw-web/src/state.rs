//! Application state.

use std::sync::Arc;
use tokio::sync::Mutex;

use jw_core::agents::AgentDesk;
use jw_core::ai::TextGenerator;
use jw_core::analytics::AnalyticsView;
use jw_core::auth::{self, AuthHub};
use jw_core::config::TimingConfig;
use jw_core::integrations::IntegrationHub;
use jw_core::kanban::SuggestionTray;
use jw_core::onboarding::OnboardingSession;
use jw_core::realtime::{CollaborationRoom, LocalChannel, VOICE_CHANNEL};
use jw_core::settings::TeamSettings;
use jw_core::standup::StandupSession;
use jw_core::AppStore;
use jw_store::WorkbenchEvent;

/// Per-screen session state. Each screen is locked on its own so a slow
/// AI call on one never blocks another.
pub struct Screens {
    pub onboarding: Mutex<OnboardingSession>,
    pub suggestions: Mutex<SuggestionTray>,
    pub standup: Mutex<StandupSession>,
    pub analytics: Mutex<AnalyticsView>,
    pub integrations: Mutex<IntegrationHub>,
    pub settings: Mutex<TeamSettings>,
    pub agents: Mutex<AgentDesk>,
    pub room: Mutex<CollaborationRoom>,
}

impl Screens {
    fn new(timing: &TimingConfig, channel: Arc<LocalChannel>) -> Self {
        Self {
            onboarding: Mutex::new(OnboardingSession::new(timing.thinking())),
            suggestions: Mutex::new(SuggestionTray::new()),
            standup: Mutex::new(StandupSession::new(
                timing.standup_advance(),
                timing.easter_egg(),
            )),
            analytics: Mutex::new(AnalyticsView::new(timing.refresh())),
            integrations: Mutex::new(IntegrationHub::new(timing.connect(), timing.sync())),
            settings: Mutex::new(TeamSettings::new()),
            agents: Mutex::new(AgentDesk::new()),
            room: Mutex::new(CollaborationRoom::new(channel, timing.join_call())),
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: AppStore,
    pub ai: Arc<dyn TextGenerator>,
    pub auth: AuthHub,
    pub timing: TimingConfig,
    pub channel: Arc<LocalChannel>,
    pub screens: Arc<Screens>,
}

impl AppState {
    /// Must be called inside a tokio runtime; the auth-to-store sync task
    /// is spawned here.
    pub fn new(store: AppStore, ai: Arc<dyn TextGenerator>, timing: TimingConfig) -> Self {
        let auth = AuthHub::new();
        auth.finish_loading();
        auth::spawn_user_sync(store.clone(), auth.subscribe());

        let channel = Arc::new(LocalChannel::new(VOICE_CHANNEL));
        let screens = Arc::new(Screens::new(&timing, channel.clone()));
        Self {
            store,
            ai,
            auth,
            timing,
            channel,
            screens,
        }
    }

    /// Broadcast an event to all WebSocket clients.
    pub fn broadcast(&self, event: WorkbenchEvent) {
        let _ = self.store.events().send(event);
    }
}
