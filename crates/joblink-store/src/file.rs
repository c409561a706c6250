//! File-backed store implementation.
//!
//! One file per key beneath a base directory. Logical keys may contain `/`
//! separators, which map to subdirectories; traversal sequences are
//! rejected. Writes land in a temp file first and are renamed into place,
//! so a crash mid-write leaves the previous value intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::{Store, StoreError, StoreResult};

/// Durable [`Store`] writing one file per key under `base_path`.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new FileStore rooted at `base_path`, creating the
    /// directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StoreError::Backend(format!(
                "Failed to create store directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(FileStore { base_path })
    }

    /// Convert a logical key to a filesystem path, refusing traversal.
    fn key_to_path(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("empty key".to_string()));
        }
        if key.starts_with('/') || key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }

    async fn ensure_parent_dir(path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.key_to_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let path = self.key_to_path(key)?;
        Self::ensure_parent_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&value).await?;
        file.flush().await?;
        drop(file);

        fs::rename(&tmp, &path).await?;
        tracing::trace!(key = %key, bytes = value.len(), "store write");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.key_to_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn contains(&self, key: &str) -> StoreResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn round_trip_and_overwrite() {
        let (_dir, store) = store().await;
        store.set("auth/access_token", b"tok-1".to_vec()).await.unwrap();
        store.set("auth/access_token", b"tok-2".to_vec()).await.unwrap();
        assert_eq!(
            store.get("auth/access_token").await.unwrap(),
            Some(b"tok-2".to_vec())
        );
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::new(dir.path()).await.unwrap();
            store.set("pending/bids", b"[1]".to_vec()).await.unwrap();
        }
        let reopened = FileStore::new(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("pending/bids").await.unwrap(),
            Some(b"[1]".to_vec())
        );
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let (_dir, store) = store().await;
        for key in ["../escape", "a/../../b", "/absolute", "", "a//b"] {
            let err = store.get(key).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(_)), "key {:?}", key);
        }
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, store) = store().await;
        store.set("k", b"v".to_vec()).await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(!store.contains("k").await.unwrap());
    }
}
