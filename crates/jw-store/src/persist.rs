//! Namespaced state blob persistence.
//!
//! The persisted value is `{"state": <slice>, "version": 0}`. The version is
//! written for compatibility with the browser storage format and ignored on
//! read; there is no migration logic.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::StorageBackend;
use crate::client::StoreResult;

/// Default storage namespace.
pub const DEFAULT_NAMESPACE: &str = "jungwell-app-storage";

/// Version number written into every envelope.
pub const STATE_VERSION: u32 = 0;

/// On-disk wrapper around a persisted state slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistEnvelope<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

/// Load the state slice stored under `namespace`.
///
/// A blob that no longer parses is logged and treated as absent so a bad
/// write never locks the user out of the workbench.
pub async fn load_state<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    namespace: &str,
) -> StoreResult<Option<T>> {
    let Some(raw) = backend.get(namespace).await? else {
        debug!(namespace, backend = backend.name(), "No persisted state");
        return Ok(None);
    };

    match serde_json::from_str::<PersistEnvelope<T>>(&raw) {
        Ok(envelope) => {
            debug!(namespace, version = envelope.version, "Loaded persisted state");
            Ok(Some(envelope.state))
        }
        Err(e) => {
            warn!(namespace, error = %e, "Discarding unreadable persisted state");
            Ok(None)
        }
    }
}

/// Save the state slice under `namespace`.
pub async fn save_state<T: Serialize>(
    backend: &dyn StorageBackend,
    namespace: &str,
    state: &T,
) -> StoreResult<()> {
    let envelope = PersistEnvelope {
        state,
        version: STATE_VERSION,
    };
    let json = serde_json::to_string(&envelope)?;
    backend.set(namespace, &json).await
}

/// Remove everything stored under `namespace`.
pub async fn clear_state(backend: &dyn StorageBackend, namespace: &str) -> StoreResult<()> {
    backend.remove(namespace).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Slice {
        count: u32,
        names: Vec<String>,
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let backend = MemoryBackend::new();
        let slice = Slice {
            count: 3,
            names: vec!["a".into(), "b".into()],
        };
        save_state(&backend, DEFAULT_NAMESPACE, &slice).await.unwrap();

        let raw = backend.get(DEFAULT_NAMESPACE).await.unwrap().unwrap();
        assert!(raw.contains("\"version\":0"));
        assert!(raw.starts_with("{\"state\":"));

        let loaded: Option<Slice> = load_state(&backend, DEFAULT_NAMESPACE).await.unwrap();
        assert_eq!(loaded, Some(slice));
    }

    #[tokio::test]
    async fn test_missing_version_is_accepted() {
        let backend = MemoryBackend::new();
        backend
            .set(DEFAULT_NAMESPACE, r#"{"state":{"count":1,"names":[]}}"#)
            .await
            .unwrap();
        let loaded: Option<Slice> = load_state(&backend, DEFAULT_NAMESPACE).await.unwrap();
        assert_eq!(loaded.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_treated_as_absent() {
        let backend = MemoryBackend::new();
        backend.set(DEFAULT_NAMESPACE, "not json").await.unwrap();
        let loaded: Option<Slice> = load_state(&backend, DEFAULT_NAMESPACE).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let backend = MemoryBackend::new();
        save_state(&backend, "ns", &Slice { count: 0, names: vec![] }).await.unwrap();
        clear_state(&backend, "ns").await.unwrap();
        let loaded: Option<Slice> = load_state(&backend, "ns").await.unwrap();
        assert!(loaded.is_none());
    }
}
