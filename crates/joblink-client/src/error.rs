//! Client-local errors
//!
//! `ClientError` covers faults that happen before or beside the wire:
//! store access, body serialization, calling an authenticated endpoint
//! with no session. Network outcomes are never errors at this level; they
//! come back as envelopes (see [`crate::response`]).

use joblink_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Not logged in")]
    NotLoggedIn,
}
