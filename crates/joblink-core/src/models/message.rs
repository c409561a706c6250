use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-side message payload, created before the server assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDraft {
    pub recipient_id: Uuid,
    pub body: String,
}

/// Server-acknowledged message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}
