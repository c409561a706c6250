use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-side bid payload, created before the server assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidDraft {
    pub service_id: Uuid,
    pub amount: f64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

/// Server-acknowledged bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub service_id: Uuid,
    pub bidder_id: Uuid,
    pub amount: f64,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}
