//! Service wiring
//!
//! One [`Services`] value is constructed at process start and passed by
//! reference to whatever consumes it. There is no ambient global state
//! and no initialized-flag; constructing the struct is the
//! initialization.

use std::sync::Arc;

use anyhow::Context;

use joblink_client::{ApiClient, HttpTransport, Transport};
use joblink_core::ClientConfig;
use joblink_store::{FileStore, Store};

use crate::orchestrator::SyncOrchestrator;
use crate::queue::OfflineQueue;

const DEFAULT_DATA_DIR: &str = ".joblink";

/// Fully wired client stack: store, pipeline, queue, orchestrator.
pub struct Services {
    pub store: Arc<dyn Store>,
    pub client: Arc<ApiClient>,
    pub queue: Arc<OfflineQueue>,
    pub sync: Arc<SyncOrchestrator>,
}

impl Services {
    /// Wire the stack from explicit collaborators.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn Store>,
    ) -> Self {
        let client = Arc::new(ApiClient::new(config.clone(), transport, store.clone()));
        let queue = Arc::new(OfflineQueue::new(store.clone(), config.queue_capacity));
        let sync = Arc::new(SyncOrchestrator::new(
            client.clone(),
            queue.clone(),
            store.clone(),
        ));
        Self {
            store,
            client,
            queue,
            sync,
        }
    }

    /// Wire the stack from the environment: config vars plus
    /// `JOBLINK_DATA_DIR` for the file store location.
    pub async fn from_env() -> Result<Self, anyhow::Error> {
        let config = ClientConfig::from_env()?;
        let data_dir = std::env::var("JOBLINK_DATA_DIR")
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());

        let store: Arc<dyn Store> = Arc::new(
            FileStore::new(&data_dir)
                .await
                .with_context(|| format!("Failed to open data dir {}", data_dir))?,
        );
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new().context("Failed to create HTTP transport")?);

        Ok(Self::new(config, transport, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joblink_client::testing::MockTransport;
    use joblink_store::MemoryStore;

    #[test]
    fn wiring_shares_one_store() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let services = Services::new(
            ClientConfig::default(),
            Arc::new(MockTransport::new()),
            store.clone(),
        );
        assert!(Arc::ptr_eq(&services.store, &store));
    }
}
