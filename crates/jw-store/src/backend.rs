//! Key-value storage backends.
//!
//! Every backend stores opaque string values under string keys. The
//! workbench only ever uses one key (the namespace), but the backends do not
//! assume that.

use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::client::{RedisPool, StoreError, StoreResult};

/// Durable key-value storage.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
        && !key.contains("..");
    if valid {
        Ok(())
    } else {
        Err(StoreError::OperationFailed(format!("invalid storage key '{}'", key)))
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key.replace(':', "_")))
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write-then-rename so a crash never leaves a half-written blob.
        // Each write gets its own temp file; the last rename wins.
        let path = self.path_for(key);
        let tmp = path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));
        let written = match tokio::fs::write(&tmp, value).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %path.display(), bytes = value.len(), "Wrote state file");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Stores each key as a Redis string under `jw:state:<key>`.
#[derive(Clone)]
pub struct RedisBackend {
    pool: RedisPool,
}

impl RedisBackend {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn redis_key(key: &str) -> String {
        format!("jw:state:{}", key)
    }
}

#[async_trait]
impl StorageBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        let mut conn = self.pool.clone();
        let value: Option<String> = conn.get(Self::redis_key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        let mut conn = self.pool.clone();
        conn.set::<_, _, ()>(Self::redis_key(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        let mut conn = self.pool.clone();
        conn.del::<_, ()>(Self::redis_key(key)).await?;
        Ok(())
    }
}

/// Process-local storage, used for tests and `memory://` URLs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested"));

        assert_eq!(backend.get("jungwell-app-storage").await.unwrap(), None);

        backend.set("jungwell-app-storage", "{\"a\":1}").await.unwrap();
        assert_eq!(
            backend.get("jungwell-app-storage").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(dir.path().join("nested/jungwell-app-storage.json").exists());

        backend.remove("jungwell-app-storage").await.unwrap();
        assert_eq!(backend.get("jungwell-app-storage").await.unwrap(), None);
        // Second removal is a no-op.
        backend.remove("jungwell-app-storage").await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_backend_concurrent_sets() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FileBackend::new(dir.path()));
        let small = "a".repeat(100_000);
        let large = "b".repeat(200_000);

        for _ in 0..100 {
            let first = {
                let backend = backend.clone();
                let value = small.clone();
                tokio::spawn(async move { backend.set("ns", &value).await })
            };
            let second = {
                let backend = backend.clone();
                let value = large.clone();
                tokio::spawn(async move { backend.set("ns", &value).await })
            };
            first.await.unwrap().unwrap();
            second.await.unwrap().unwrap();

            let stored = backend.get("ns").await.unwrap().unwrap();
            assert!(stored == small || stored == large);
        }

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(leftovers, vec!["ns.json".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_backend_overwrites() {
        let backend = MemoryBackend::new();
        backend.set("k", "one").await.unwrap();
        backend.set("k", "two").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        assert!(backend.set("../escape", "x").await.is_err());
        assert!(backend.set("a/b", "x").await.is_err());
        assert!(backend.get("").await.is_err());
    }
}
