//! Offline synchronization engine for the JobLink client.
//!
//! Mutations made while disconnected land in the durable
//! [`OfflineQueue`]; the [`SyncOrchestrator`] drains them in batches
//! through the request pipeline, reconciles server-assigned identifiers,
//! and keeps cached server state (profile, catalog) fresh.

pub mod context;
pub mod error;
pub mod orchestrator;
pub mod queue;

pub use context::Services;
pub use error::SyncError;
pub use orchestrator::{
    FullSyncReport, RestoreOutcome, SyncOrchestrator, SyncState, UploadOutcome,
};
pub use queue::OfflineQueue;
