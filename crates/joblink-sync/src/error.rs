//! Sync engine errors

use joblink_client::ClientError;
use joblink_core::models::Collection;
use joblink_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Queue for {collection} is full ({capacity} pending)")]
    QueueFull {
        collection: Collection,
        capacity: usize,
    },

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),
}
