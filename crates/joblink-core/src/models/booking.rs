use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-side booking payload, created before the server assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDraft {
    pub service_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Requested,
    Confirmed,
    Completed,
    Cancelled,
}

/// Server-acknowledged booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub service_id: Uuid,
    pub customer_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}
