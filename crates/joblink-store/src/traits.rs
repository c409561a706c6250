//! Store abstraction trait
//!
//! All local storage backends must implement this trait. Operations are
//! idempotent and last-writer-wins; no multi-key atomicity is provided or
//! assumed by callers.

use async_trait::async_trait;
use thiserror::Error;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable key/value storage.
///
/// Keys are logical paths (see [`crate::keys`]); values are opaque bytes.
/// `delete` on a missing key succeeds.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the value at `key`, or `None` if absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` at `key`, replacing any existing value.
    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Remove the value at `key` if present.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Check whether `key` holds a value.
    async fn contains(&self, key: &str) -> StoreResult<bool>;
}
