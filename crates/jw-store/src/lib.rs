//! Jungwell storage layer.
//!
//! Persists the workbench state as a single namespaced JSON blob and carries
//! the in-process broadcast channel used for live updates.

pub mod backend;
pub mod broadcast;
pub mod client;
pub mod persist;

pub use backend::{FileBackend, MemoryBackend, RedisBackend, StorageBackend};
pub use broadcast::{create_broadcast_channel, BroadcastReceiver, BroadcastSender, WorkbenchEvent};
pub use client::{StoreError, StoreResult};
pub use persist::{load_state, save_state, clear_state, PersistEnvelope, DEFAULT_NAMESPACE};

use std::sync::Arc;

/// Open a storage backend from a URL.
///
/// - `redis://...` connects to Redis
/// - `memory://` keeps everything in process
/// - `file://<dir>` or a bare path stores JSON files under that directory
pub async fn open_backend(url: &str) -> StoreResult<Arc<dyn StorageBackend>> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        let pool = client::init_redis(url).await?;
        return Ok(Arc::new(RedisBackend::new(pool)));
    }
    if url.starts_with("memory://") {
        return Ok(Arc::new(MemoryBackend::new()));
    }
    let dir = url.strip_prefix("file://").unwrap_or(url);
    if dir.is_empty() {
        return Err(StoreError::OperationFailed("empty storage path".to_string()));
    }
    Ok(Arc::new(FileBackend::new(dir)))
}
