//! Offline mutation queue
//!
//! Durable, ordered record of domain mutations captured while the
//! transport is unusable or intentionally deferred. One FIFO list per
//! collection, persisted through the local store, so entries survive
//! process restarts in their original order. Temp ids are UUIDs, unique
//! across restarts by construction.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use joblink_core::models::{BidDraft, BookingDraft, Collection, MessageDraft, Pending};
use joblink_store::{get_json, keys, set_json, Store};

use crate::error::SyncError;

/// Store-backed FIFO queue of pending offline mutations.
pub struct OfflineQueue {
    store: Arc<dyn Store>,
    /// Per-collection cap; a full collection rejects new mutations
    /// rather than dropping queued ones.
    capacity: usize,
}

impl OfflineQueue {
    pub fn new(store: Arc<dyn Store>, capacity: usize) -> Self {
        Self { store, capacity }
    }

    async fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<Pending<T>>, SyncError> {
        let items = get_json(self.store.as_ref(), &keys::pending_key(collection)).await?;
        Ok(items.unwrap_or_default())
    }

    async fn save<T: Serialize>(
        &self,
        collection: Collection,
        items: &[Pending<T>],
    ) -> Result<(), SyncError> {
        set_json(self.store.as_ref(), &keys::pending_key(collection), &items).await?;
        Ok(())
    }

    async fn enqueue<T: Serialize + DeserializeOwned>(
        &self,
        collection: Collection,
        payload: T,
    ) -> Result<Uuid, SyncError> {
        let mut items: Vec<Pending<T>> = self.load(collection).await?;
        if items.len() >= self.capacity {
            return Err(SyncError::QueueFull {
                collection,
                capacity: self.capacity,
            });
        }
        let pending = Pending::new(payload);
        let id = pending.client_temp_id;
        items.push(pending);
        self.save(collection, &items).await?;
        tracing::debug!(collection = %collection, client_temp_id = %id, queued = items.len(), "mutation enqueued");
        Ok(id)
    }

    /// Queue a bid placement for later upload. Returns its temp id.
    pub async fn enqueue_bid(&self, draft: BidDraft) -> Result<Uuid, SyncError> {
        self.enqueue(Collection::Bids, draft).await
    }

    /// Queue a booking creation for later upload. Returns its temp id.
    pub async fn enqueue_booking(&self, draft: BookingDraft) -> Result<Uuid, SyncError> {
        self.enqueue(Collection::Bookings, draft).await
    }

    /// Queue a message send for later upload. Returns its temp id.
    pub async fn enqueue_message(&self, draft: MessageDraft) -> Result<Uuid, SyncError> {
        self.enqueue(Collection::Messages, draft).await
    }

    pub async fn pending_bids(&self) -> Result<Vec<Pending<BidDraft>>, SyncError> {
        self.load(Collection::Bids).await
    }

    pub async fn pending_bookings(&self) -> Result<Vec<Pending<BookingDraft>>, SyncError> {
        self.load(Collection::Bookings).await
    }

    pub async fn pending_messages(&self) -> Result<Vec<Pending<MessageDraft>>, SyncError> {
        self.load(Collection::Messages).await
    }

    /// Remove one mutation by temp id. Returns whether it was present.
    ///
    /// Payloads are handled as raw JSON here so one code path serves all
    /// three collections.
    pub async fn remove(
        &self,
        collection: Collection,
        client_temp_id: Uuid,
    ) -> Result<bool, SyncError> {
        let mut items: Vec<Pending<Value>> = self.load(collection).await?;
        let before = items.len();
        items.retain(|item| item.client_temp_id != client_temp_id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(collection, &items).await?;
        tracing::debug!(collection = %collection, client_temp_id = %client_temp_id, "mutation removed");
        Ok(true)
    }

    /// Pending counts for all collections.
    pub async fn counts(&self) -> Result<HashMap<Collection, usize>, SyncError> {
        let mut counts = HashMap::new();
        for collection in Collection::ALL {
            let items: Vec<Pending<Value>> = self.load(collection).await?;
            counts.insert(collection, items.len());
        }
        Ok(counts)
    }

    pub async fn is_empty(&self) -> Result<bool, SyncError> {
        Ok(self.counts().await?.values().all(|&count| count == 0))
    }

    /// Administrative clear of one collection. The only way besides a
    /// server-confirmed upload to drop queued mutations.
    pub async fn clear(&self, collection: Collection) -> Result<(), SyncError> {
        self.store.delete(&keys::pending_key(collection)).await?;
        tracing::info!(collection = %collection, "pending collection cleared");
        Ok(())
    }
}
