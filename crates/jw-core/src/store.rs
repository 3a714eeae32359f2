//! Application store.
//!
//! Single source of truth for cross-screen state. Mutations of the persisted
//! fields (onboarding data, current view, tasks, team members, happiness
//! pulses) are written through to the storage backend under the configured
//! namespace. The user and the transient UI flags live only in memory.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, info};

use jw_store::{BroadcastReceiver, BroadcastSender, MemoryBackend, StorageBackend, WorkbenchEvent};

use crate::config::WorkbenchConfig;
use crate::error::WorkbenchResult;
use crate::model::{
    HappinessPulse, OnboardingData, OnboardingPatch, Task, TaskPatch, TaskStatus, TeamMember, User,
    View,
};
use crate::router::{self, Screen};

/// Default time the celebration flag stays up after a task reaches done.
pub const CONFETTI_DURATION: Duration = Duration::from_millis(2000);

/// Full in-memory state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub user: Option<User>,
    pub onboarding_data: OnboardingData,
    pub current_view: View,
    pub tasks: Vec<Task>,
    pub team_members: Vec<TeamMember>,
    pub happiness_pulse: Vec<HappinessPulse>,
    pub is_standup_mode: bool,
    pub show_confetti: bool,
}

/// The whitelisted slice written to storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub onboarding_data: OnboardingData,
    pub current_view: View,
    pub tasks: Vec<Task>,
    pub team_members: Vec<TeamMember>,
    pub happiness_pulse: Vec<HappinessPulse>,
}

impl From<&AppState> for PersistedState {
    fn from(state: &AppState) -> Self {
        Self {
            onboarding_data: state.onboarding_data.clone(),
            current_view: state.current_view,
            tasks: state.tasks.clone(),
            team_members: state.team_members.clone(),
            happiness_pulse: state.happiness_pulse.clone(),
        }
    }
}

struct StoreInner {
    state: RwLock<AppState>,
    backend: Arc<dyn StorageBackend>,
    namespace: String,
    events: BroadcastSender,
    /// Serializes copy-and-save so the last write carries the latest state.
    persist_gate: tokio::sync::Mutex<()>,
    confetti_duration: Duration,
    confetti_generation: AtomicU64,
}

/// Cheaply cloneable handle to the shared store.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<StoreInner>,
}

impl AppStore {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        namespace: impl Into<String>,
        confetti_duration: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(AppState::default()),
                backend,
                namespace: namespace.into(),
                events: jw_store::create_broadcast_channel(),
                persist_gate: tokio::sync::Mutex::new(()),
                confetti_duration,
                confetti_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Store backed by process memory with default settings.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryBackend::new()),
            jw_store::DEFAULT_NAMESPACE,
            CONFETTI_DURATION,
        )
    }

    /// Open the configured backend for a project and load persisted state.
    pub async fn open(config: &WorkbenchConfig, project_dir: &Path) -> WorkbenchResult<Self> {
        let url = config.storage_url(project_dir);
        let backend = jw_store::open_backend(&url).await?;
        info!(backend = backend.name(), namespace = %config.storage.namespace, "Opening workbench store");
        let store = Self::new(backend, config.storage.namespace.clone(), config.timing.confetti());
        store.hydrate().await?;
        Ok(store)
    }

    /// Replace the persisted fields with what storage holds. Returns whether
    /// anything was found.
    pub async fn hydrate(&self) -> WorkbenchResult<bool> {
        let loaded: Option<PersistedState> =
            jw_store::load_state(self.inner.backend.as_ref(), &self.inner.namespace).await?;
        let Some(persisted) = loaded else {
            return Ok(false);
        };

        {
            let mut state = self.write();
            state.onboarding_data = persisted.onboarding_data;
            state.current_view = persisted.current_view;
            state.tasks = persisted.tasks;
            state.team_members = persisted.team_members;
            state.happiness_pulse = persisted.happiness_pulse;
            debug!(tasks = state.tasks.len(), view = %state.current_view, "Hydrated store");
        }
        Ok(true)
    }

    /// Write the persisted slice to storage.
    pub async fn persist(&self) -> WorkbenchResult<()> {
        let _gate = self.inner.persist_gate.lock().await;
        let slice = PersistedState::from(&*self.read());
        jw_store::save_state(self.inner.backend.as_ref(), &self.inner.namespace, &slice).await?;
        Ok(())
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> BroadcastReceiver {
        self.inner.events.subscribe()
    }

    /// Sender side of the event channel, for screens that publish their own
    /// events.
    pub fn events(&self) -> &BroadcastSender {
        &self.inner.events
    }

    fn emit(&self, event: WorkbenchEvent) {
        // No receivers is fine.
        let _ = self.inner.events.send(event);
    }

    fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Reads ──

    pub fn snapshot(&self) -> AppState {
        self.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn onboarding(&self) -> OnboardingData {
        self.read().onboarding_data.clone()
    }

    pub fn current_view(&self) -> View {
        self.read().current_view
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        self.read().tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn team_members(&self) -> Vec<TeamMember> {
        self.read().team_members.clone()
    }

    pub fn happiness_pulse(&self) -> Vec<HappinessPulse> {
        self.read().happiness_pulse.clone()
    }

    pub fn is_standup_mode(&self) -> bool {
        self.read().is_standup_mode
    }

    pub fn show_confetti(&self) -> bool {
        self.read().show_confetti
    }

    /// The screen the router picks for the current state.
    pub fn screen(&self) -> Screen {
        let state = self.read();
        router::route(state.onboarding_data.is_complete, state.current_view)
    }

    // ── Transient writes ──

    pub fn set_user(&self, user: Option<User>) {
        let user_id = user.as_ref().map(|u| u.id.clone());
        self.write().user = user;
        self.emit(WorkbenchEvent::UserChanged { user_id });
    }

    pub fn set_standup_mode(&self, active: bool) {
        self.write().is_standup_mode = active;
        self.emit(WorkbenchEvent::StandupModeChanged { active });
    }

    pub fn set_show_confetti(&self, active: bool) {
        self.write().show_confetti = active;
        self.emit(WorkbenchEvent::ConfettiChanged { active });
    }

    // ── Persisted writes ──

    pub async fn set_onboarding(&self, patch: OnboardingPatch) -> WorkbenchResult<()> {
        let is_complete = {
            let mut state = self.write();
            state.onboarding_data.apply(patch);
            state.onboarding_data.is_complete
        };
        self.emit(WorkbenchEvent::OnboardingUpdated { is_complete });
        self.persist().await
    }

    pub async fn set_current_view(&self, view: View) -> WorkbenchResult<()> {
        self.write().current_view = view;
        self.emit(WorkbenchEvent::ViewChanged {
            view: view.as_str().to_string(),
        });
        self.persist().await
    }

    pub async fn set_tasks(&self, tasks: Vec<Task>) -> WorkbenchResult<()> {
        let count = tasks.len();
        self.write().tasks = tasks;
        self.emit(WorkbenchEvent::TasksReplaced { count });
        self.persist().await
    }

    pub async fn add_task(&self, task: Task) -> WorkbenchResult<()> {
        let task_id = task.id.clone();
        self.write().tasks.push(task);
        self.emit(WorkbenchEvent::TaskAdded { task_id });
        self.persist().await
    }

    /// Merge `patch` into the task with `id`. Unknown ids are a no-op and
    /// return `false`.
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> WorkbenchResult<bool> {
        let status = {
            let mut state = self.write();
            match state.tasks.iter_mut().find(|t| t.id == id) {
                Some(task) => {
                    task.apply(patch);
                    Some(task.status)
                }
                None => None,
            }
        };

        let Some(status) = status else {
            debug!(task_id = %id, "update_task: no matching task");
            return Ok(false);
        };

        self.emit(WorkbenchEvent::TaskUpdated {
            task_id: id.to_string(),
            status: status.as_str().to_string(),
        });
        self.persist().await?;
        Ok(true)
    }

    /// Move a task to another lane. Reaching `done` raises the celebration
    /// flag, which a timer lowers again after the confetti duration.
    pub async fn move_task(&self, id: &str, status: TaskStatus) -> WorkbenchResult<bool> {
        let moved = self.update_task(id, TaskPatch::status(status)).await?;
        if moved && status == TaskStatus::Done {
            info!(task_id = %id, "Task done, celebrating");
            self.celebrate();
        }
        Ok(moved)
    }

    fn celebrate(&self) {
        let generation = self.inner.confetti_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_show_confetti(true);

        let store = self.clone();
        let duration = self.inner.confetti_duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // A later celebration owns the flag now.
            if store.inner.confetti_generation.load(Ordering::SeqCst) == generation {
                store.set_show_confetti(false);
            }
        });
    }

    pub async fn set_team_members(&self, members: Vec<TeamMember>) -> WorkbenchResult<()> {
        let count = members.len();
        self.write().team_members = members;
        self.emit(WorkbenchEvent::TeamChanged { count });
        self.persist().await
    }

    pub async fn set_happiness_pulse(&self, pulses: Vec<HappinessPulse>) -> WorkbenchResult<()> {
        let count = pulses.len();
        self.write().happiness_pulse = pulses;
        self.emit(WorkbenchEvent::PulsesReplaced { count });
        self.persist().await
    }

    /// Append one pulse to the history.
    pub async fn add_happiness_pulse(&self, pulse: HappinessPulse) -> WorkbenchResult<()> {
        let event = WorkbenchEvent::PulseSubmitted {
            user_id: pulse.user_id.clone(),
            month: pulse.month.clone(),
        };
        self.write().happiness_pulse.push(pulse);
        self.emit(event);
        self.persist().await
    }

    /// Drop the persisted blob and reset every field to its default.
    pub async fn reset(&self) -> WorkbenchResult<()> {
        let _gate = self.inner.persist_gate.lock().await;
        *self.write() = AppState::default();
        jw_store::clear_state(self.inner.backend.as_ref(), &self.inner.namespace).await?;
        self.emit(WorkbenchEvent::TasksReplaced { count: 0 });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemberStatus;

    fn store_with_backend(backend: Arc<dyn StorageBackend>) -> AppStore {
        AppStore::new(backend, "test-ns", CONFETTI_DURATION)
    }

    #[tokio::test]
    async fn test_add_task_then_lookup() {
        let store = AppStore::in_memory();
        let task = Task::new("Review Q4 renewal pipeline", TaskStatus::ToDo);
        let id = task.id.clone();
        store.add_task(task).await.unwrap();

        let found = store.task(&id).unwrap();
        assert_eq!(found.title, "Review Q4 renewal pipeline");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let store = AppStore::in_memory();
        store.add_task(Task::new("a", TaskStatus::ToDo)).await.unwrap();
        let before = store.tasks();

        let updated = store
            .update_task(
                "missing",
                TaskPatch {
                    title: Some("changed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated);
        assert_eq!(store.tasks(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_task_keeps_status_in_lanes() {
        let store = AppStore::in_memory();
        let task = Task::new("a", TaskStatus::ParkingLot);
        let id = task.id.clone();
        store.add_task(task).await.unwrap();

        for status in TaskStatus::ALL {
            assert!(store.move_task(&id, status).await.unwrap());
            let current = store.task(&id).unwrap().status;
            assert_eq!(current, status);
            assert!(TaskStatus::ALL.contains(&current));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_raises_then_lowers_confetti() {
        let store = AppStore::in_memory();
        let task = Task::new("a", TaskStatus::Doing);
        let id = task.id.clone();
        store.add_task(task).await.unwrap();

        store.move_task(&id, TaskStatus::Done).await.unwrap();
        assert!(store.show_confetti());

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert!(store.show_confetti());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!store.show_confetti());
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_lanes_never_raise_confetti() {
        let store = AppStore::in_memory();
        let task = Task::new("a", TaskStatus::Done);
        let id = task.id.clone();
        store.add_task(task).await.unwrap();

        for status in [TaskStatus::ParkingLot, TaskStatus::ToDo, TaskStatus::Doing] {
            store.move_task(&id, status).await.unwrap();
            assert!(!store.show_confetti());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_celebration_extends_window() {
        let store = AppStore::in_memory();
        let a = Task::new("a", TaskStatus::Doing);
        let b = Task::new("b", TaskStatus::Doing);
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        store.add_task(a).await.unwrap();
        store.add_task(b).await.unwrap();

        store.move_task(&a_id, TaskStatus::Done).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        store.move_task(&b_id, TaskStatus::Done).await.unwrap();

        // First timer fires here but no longer owns the flag.
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert!(store.show_confetti());

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert!(!store.show_confetti());
    }

    #[tokio::test]
    async fn test_unknown_task_move_does_not_celebrate() {
        let store = AppStore::in_memory();
        assert!(!store.move_task("nope", TaskStatus::Done).await.unwrap());
        assert!(!store.show_confetti());
    }

    #[tokio::test]
    async fn test_persists_whitelisted_fields_only() {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        let store = store_with_backend(backend.clone());

        store.set_user(Some(User {
            id: "u1".into(),
            email: "u@x.io".into(),
            display_name: None,
        }));
        store.set_standup_mode(true);
        store
            .set_onboarding(OnboardingPatch {
                company_description: Some("Acme".into()),
                is_complete: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        store.set_current_view(View::Kanban).await.unwrap();
        store.add_task(Task::new("persist me", TaskStatus::ToDo)).await.unwrap();
        store
            .set_team_members(vec![TeamMember {
                id: "1".into(),
                name: "Sarah Chen".into(),
                role: "CS Manager".into(),
                avatar: None,
                status: MemberStatus::Online,
            }])
            .await
            .unwrap();

        let raw = backend.get("test-ns").await.unwrap().unwrap();
        assert!(raw.contains("persist me"));
        assert!(!raw.contains("isStandupMode"));
        assert!(!raw.contains("u@x.io"));

        let reopened = store_with_backend(backend);
        assert!(reopened.hydrate().await.unwrap());
        assert_eq!(reopened.current_view(), View::Kanban);
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.team_members().len(), 1);
        assert!(reopened.onboarding().is_complete);
        assert!(reopened.user().is_none());
        assert!(!reopened.is_standup_mode());
    }

    /// Memory backend whose first write stalls.
    struct SlowFirstSet {
        inner: MemoryBackend,
        stalled: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl StorageBackend for SlowFirstSet {
        fn name(&self) -> &'static str {
            "slow-first-set"
        }

        async fn get(&self, key: &str) -> jw_store::StoreResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> jw_store::StoreResult<()> {
            if !self.stalled.swap(true, Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> jw_store::StoreResult<()> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_writes_persist_latest_state() {
        let backend: Arc<dyn StorageBackend> = Arc::new(SlowFirstSet {
            inner: MemoryBackend::new(),
            stalled: std::sync::atomic::AtomicBool::new(false),
        });
        let store = store_with_backend(backend.clone());

        let (a, b) = tokio::join!(
            store.add_task(Task::new("first", TaskStatus::ToDo)),
            store.add_task(Task::new("second", TaskStatus::ToDo)),
        );
        a.unwrap();
        b.unwrap();
        assert_eq!(store.tasks().len(), 2);

        let reopened = store_with_backend(backend);
        assert!(reopened.hydrate().await.unwrap());
        assert_eq!(reopened.tasks().len(), 2);
    }

    #[tokio::test]
    async fn test_replacing_pulses_emits_event() {
        let store = AppStore::in_memory();
        let mut rx = store.subscribe();

        store.set_happiness_pulse(Vec::new()).await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            WorkbenchEvent::PulsesReplaced { count: 0 }
        );
    }

    #[tokio::test]
    async fn test_hydrate_empty_backend() {
        let store = AppStore::in_memory();
        assert!(!store.hydrate().await.unwrap());
        assert_eq!(store.current_view(), View::Onboarding);
    }

    #[tokio::test]
    async fn test_screen_follows_completion() {
        let store = AppStore::in_memory();
        store.set_current_view(View::Analytics).await.unwrap();
        assert_eq!(store.screen(), Screen::Onboarding);

        store
            .set_onboarding(OnboardingPatch {
                is_complete: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(store.screen(), Screen::Analytics);
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let store = AppStore::in_memory();
        let mut rx = store.subscribe();
        store.set_current_view(View::Kanban).await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            WorkbenchEvent::ViewChanged {
                view: "kanban".into()
            }
        );
    }

    #[tokio::test]
    async fn test_reset_clears_storage() {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        let store = store_with_backend(backend.clone());
        store.add_task(Task::new("x", TaskStatus::ToDo)).await.unwrap();
        store.reset().await.unwrap();
        assert!(store.tasks().is_empty());
        assert!(backend.get("test-ns").await.unwrap().is_none());
    }
}
