//! Authentication state subscription.
//!
//! The auth provider pushes `AuthState {user, isLoading}` through a watch
//! channel. [`spawn_user_sync`] copies the user into the store whenever it
//! changes.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::model::{AuthState, User};
use crate::store::AppStore;

/// Publishing side of the auth state.
#[derive(Clone)]
pub struct AuthHub {
    tx: watch::Sender<AuthState>,
}

impl Default for AuthHub {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthHub {
    /// Starts in the loading state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn sign_in(&self, user: User) {
        info!(user_id = %user.id, "Signed in");
        self.tx.send_replace(AuthState {
            user: Some(user),
            is_loading: false,
        });
    }

    pub fn sign_out(&self) {
        info!("Signed out");
        self.tx.send_replace(AuthState {
            user: None,
            is_loading: false,
        });
    }

    /// Leave the loading state without a user.
    pub fn finish_loading(&self) {
        self.tx.send_modify(|state| state.is_loading = false);
    }
}

/// Keep `store.user` in step with the auth provider until the hub is dropped.
pub fn spawn_user_sync(store: AppStore, mut rx: watch::Receiver<AuthState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let initial = rx.borrow_and_update().user.clone();
        store.set_user(initial);
        while rx.changed().await.is_ok() {
            let user = rx.borrow_and_update().user.clone();
            if store.user() != user {
                store.set_user(user);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "sarah@company.com".into(),
            display_name: Some("Sarah".into()),
        }
    }

    #[test]
    fn test_hub_transitions() {
        let hub = AuthHub::new();
        assert!(hub.current().is_loading);

        hub.finish_loading();
        assert_eq!(
            hub.current(),
            AuthState {
                user: None,
                is_loading: false
            }
        );

        hub.sign_in(user());
        assert_eq!(hub.current().user, Some(user()));

        hub.sign_out();
        assert!(hub.current().user.is_none());
    }

    #[tokio::test]
    async fn test_user_sync_follows_hub() {
        let hub = AuthHub::new();
        let store = AppStore::in_memory();
        let mut events = store.subscribe();
        let handle = spawn_user_sync(store.clone(), hub.subscribe());

        // Initial (empty) user is pushed first.
        events.recv().await.unwrap();

        hub.sign_in(user());
        events.recv().await.unwrap();
        assert_eq!(store.user(), Some(user()));

        hub.sign_out();
        events.recv().await.unwrap();
        assert!(store.user().is_none());

        drop(hub);
        handle.await.unwrap();
    }
}
