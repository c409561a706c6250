use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three offline mutation collections, each an independent FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Bids,
    Bookings,
    Messages,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Bids, Collection::Bookings, Collection::Messages];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Bids => "bids",
            Collection::Bookings => "bookings",
            Collection::Messages => "messages",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freshness metadata attached to bulk-downloaded cacheable resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMetadata {
    pub sync_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub expires_after: Option<DateTime<Utc>>,
}

impl SyncMetadata {
    /// Stamp metadata at the current instant.
    pub fn stamped(expires_after: Option<DateTime<Utc>>) -> Self {
        Self {
            sync_timestamp: Utc::now(),
            expires_after,
        }
    }

    /// A resource is stale when `now` is past `expires_after` (if set), or
    /// when its age exceeds `refresh_window` otherwise.
    pub fn is_stale(&self, now: DateTime<Utc>, refresh_window: Duration) -> bool {
        match self.expires_after {
            Some(expires_after) => now > expires_after,
            None => now - self.sync_timestamp > refresh_window,
        }
    }
}

/// A cached resource paired with its freshness metadata, as written to the
/// local store. Overwritten wholesale on every successful download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResource<T> {
    pub data: T,
    pub meta: SyncMetadata,
}

/// A queued offline mutation awaiting server acceptance.
///
/// `client_temp_id` is unique within the queue and never reused; the
/// record is destroyed only once the server confirms acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pending<T> {
    pub client_temp_id: Uuid,
    pub payload: T,
    pub enqueued_at: DateTime<Utc>,
}

impl<T> Pending<T> {
    pub fn new(payload: T) -> Self {
        Self {
            client_temp_id: Uuid::new_v4(),
            payload,
            enqueued_at: Utc::now(),
        }
    }
}

/// Server confirmation of one uploaded mutation. Joins back to the queued
/// record by `client_temp_id`; `server_id` is the authoritative identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedItem {
    pub client_temp_id: Uuid,
    pub server_id: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Server rejection of one uploaded mutation. The queued record is kept
/// for a future attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadError {
    pub client_temp_id: Uuid,
    pub error: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// `POST /api/sync/upload/` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUploadRequest {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bids: Vec<Pending<super::BidDraft>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bookings: Vec<Pending<super::BookingDraft>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Pending<super::MessageDraft>>,
}

impl BatchUploadRequest {
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.bookings.is_empty() && self.messages.is_empty()
    }
}

/// Per-collection results inside a batch upload response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedSets {
    #[serde(default)]
    pub bids: Vec<ProcessedItem>,
    #[serde(default)]
    pub bookings: Vec<ProcessedItem>,
    #[serde(default)]
    pub messages: Vec<ProcessedItem>,
    #[serde(default)]
    pub errors: Vec<UploadError>,
}

impl ProcessedSets {
    pub fn for_collection(&self, collection: Collection) -> &[ProcessedItem] {
        match collection {
            Collection::Bids => &self.bids,
            Collection::Bookings => &self.bookings,
            Collection::Messages => &self.messages,
        }
    }

    pub fn processed_count(&self) -> usize {
        self.bids.len() + self.bookings.len() + self.messages.len()
    }
}

/// `POST /api/sync/upload/` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUploadResponse {
    pub success: bool,
    pub processed: ProcessedSets,
    pub sync_timestamp: DateTime<Utc>,
}
