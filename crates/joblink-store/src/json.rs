//! JSON helpers layered over the byte-oriented [`Store`] trait.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::traits::{Store, StoreResult};

/// Read and deserialize the JSON value at `key`, or `None` if absent.
pub async fn get_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> StoreResult<Option<T>> {
    match store.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON and write it at `key`.
pub async fn set_json<T: Serialize>(store: &dyn Store, key: &str, value: &T) -> StoreResult<()> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn json_round_trip() {
        let store = MemoryStore::new();
        set_json(&store, "nums", &vec![1, 2, 3]).await.unwrap();
        let back: Option<Vec<i32>> = get_json(&store, "nums").await.unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = MemoryStore::new();
        let back: Option<String> = get_json(&store, "absent").await.unwrap();
        assert!(back.is_none());
    }

    #[tokio::test]
    async fn malformed_value_is_an_error() {
        let store = MemoryStore::new();
        store.set("bad", b"not json".to_vec()).await.unwrap();
        let back: StoreResult<Option<Vec<i32>>> = get_json(&store, "bad").await;
        assert!(back.is_err());
    }
}
