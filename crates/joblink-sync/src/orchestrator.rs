//! Sync orchestration
//!
//! Drains the offline queue by uploading batches through the pipeline,
//! reconciles server-assigned identifiers back onto queued items, and
//! refreshes cached server state (profile, service catalog) with
//! freshness metadata. Partial upload success is a normal outcome: only
//! server-confirmed items leave the queue.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use joblink_client::ApiClient;
use joblink_core::models::{
    BatchUploadRequest, CachedResource, CatalogSnapshot, Collection, ProcessedSets,
    ServiceFilters, SyncMetadata, UserProfile,
};
use joblink_store::{get_json, keys, set_json, Store};

use crate::error::SyncError;
use crate::queue::OfflineQueue;

/// Observable phase of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Uploading,
    Downloading,
}

/// Result of one batch upload. `processed.errors` lists the mutations the
/// server rejected; those stay queued for a future attempt.
#[derive(Debug, Default)]
pub struct UploadOutcome {
    pub processed: ProcessedSets,
    pub sync_timestamp: Option<DateTime<Utc>>,
}

impl UploadOutcome {
    pub fn fully_processed(&self) -> bool {
        self.processed.errors.is_empty()
    }
}

/// Result of [`SyncOrchestrator::on_connectivity_restored`].
#[derive(Debug)]
pub struct RestoreOutcome {
    /// `None` when the upload step itself failed; queued mutations are
    /// untouched in that case.
    pub upload: Option<UploadOutcome>,
    pub catalog_refreshed: bool,
}

/// Aggregated result of a full sync. Each step is independently
/// retryable; overall success requires all three.
#[derive(Debug)]
pub struct FullSyncReport {
    pub upload: Result<UploadOutcome, SyncError>,
    pub profile: Result<UserProfile, SyncError>,
    pub catalog: Result<CatalogSnapshot, SyncError>,
}

impl FullSyncReport {
    pub fn success(&self) -> bool {
        self.upload.is_ok() && self.profile.is_ok() && self.catalog.is_ok()
    }
}

pub struct SyncOrchestrator {
    client: Arc<ApiClient>,
    queue: Arc<OfflineQueue>,
    store: Arc<dyn Store>,
    state: std::sync::Mutex<SyncState>,
    /// Serializes batch uploads so two flights cannot race on the same
    /// pending collections before removals land.
    upload_flight: tokio::sync::Mutex<()>,
}

struct StateGuard<'a> {
    state: &'a std::sync::Mutex<SyncState>,
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            *state = SyncState::Idle;
        }
    }
}

impl SyncOrchestrator {
    pub fn new(client: Arc<ApiClient>, queue: Arc<OfflineQueue>, store: Arc<dyn Store>) -> Self {
        Self {
            client,
            queue,
            store,
            state: std::sync::Mutex::new(SyncState::Idle),
            upload_flight: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state.lock().map(|s| *s).unwrap_or(SyncState::Idle)
    }

    fn enter(&self, next: SyncState) -> StateGuard<'_> {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
        StateGuard { state: &self.state }
    }

    /// Upload every pending mutation from all three collections in one
    /// batch, then remove the server-confirmed ones.
    ///
    /// Short-circuits to an empty success when nothing is queued. A
    /// mutation is removed only when its temp id appears in the server's
    /// processed list; rejected and unacknowledged mutations stay queued.
    pub async fn upload_pending(&self) -> Result<UploadOutcome, SyncError> {
        let _flight = self.upload_flight.lock().await;

        let bids = self.queue.pending_bids().await?;
        let bookings = self.queue.pending_bookings().await?;
        let messages = self.queue.pending_messages().await?;

        if bids.is_empty() && bookings.is_empty() && messages.is_empty() {
            tracing::debug!("nothing pending, upload skipped");
            return Ok(UploadOutcome::default());
        }

        let _state = self.enter(SyncState::Uploading);
        let request = BatchUploadRequest {
            timestamp: Utc::now(),
            bids,
            bookings,
            messages,
        };
        tracing::info!(
            bids = request.bids.len(),
            bookings = request.bookings.len(),
            messages = request.messages.len(),
            "uploading pending mutations"
        );

        let envelope = self.client.upload_batch(&request).await?;
        if !envelope.success {
            return Err(SyncError::UploadFailed(envelope.message));
        }
        let response = match envelope.data.into_value() {
            Some(response) => response,
            None => {
                return Err(SyncError::UploadFailed(
                    "upload response missing or malformed".to_string(),
                ))
            }
        };
        if !response.success {
            return Err(SyncError::UploadFailed(
                "server rejected the batch".to_string(),
            ));
        }

        for collection in Collection::ALL {
            for item in response.processed.for_collection(collection) {
                self.queue.remove(collection, item.client_temp_id).await?;
            }
        }

        tracing::info!(
            processed = response.processed.processed_count(),
            errors = response.processed.errors.len(),
            "upload complete"
        );
        Ok(UploadOutcome {
            processed: response.processed,
            sync_timestamp: Some(response.sync_timestamp),
        })
    }

    /// Download the profile and overwrite the cached copy.
    pub async fn download_profile(&self) -> Result<UserProfile, SyncError> {
        let _state = self.enter(SyncState::Downloading);

        let envelope = self.client.fetch_profile().await?;
        if !envelope.success {
            return Err(SyncError::DownloadFailed(envelope.message));
        }
        let profile = match envelope.data.into_value() {
            Some(profile) => profile,
            None => {
                return Err(SyncError::DownloadFailed(
                    "profile payload missing or malformed".to_string(),
                ))
            }
        };

        let cached = CachedResource {
            data: profile.clone(),
            meta: SyncMetadata::stamped(None),
        };
        set_json(self.store.as_ref(), keys::USER_PROFILE, &cached).await?;
        Ok(profile)
    }

    /// Download a catalog page and overwrite the cached copy, stamping a
    /// fresh sync timestamp and honoring any server-sent expiry.
    pub async fn download_services(
        &self,
        filters: &ServiceFilters,
    ) -> Result<CatalogSnapshot, SyncError> {
        let _state = self.enter(SyncState::Downloading);

        let envelope = self.client.list_services(filters).await?;
        if !envelope.success {
            return Err(SyncError::DownloadFailed(envelope.message));
        }
        let snapshot = match envelope.data.into_value() {
            Some(snapshot) => snapshot,
            None => {
                return Err(SyncError::DownloadFailed(
                    "catalog payload missing or malformed".to_string(),
                ))
            }
        };

        let cached = CachedResource {
            data: snapshot.clone(),
            meta: SyncMetadata::stamped(snapshot.expires_after),
        };
        set_json(self.store.as_ref(), keys::CATALOG, &cached).await?;
        tracing::debug!(services = snapshot.services.len(), "catalog cached");
        Ok(snapshot)
    }

    pub async fn cached_catalog(
        &self,
    ) -> Result<Option<CachedResource<CatalogSnapshot>>, SyncError> {
        Ok(get_json(self.store.as_ref(), keys::CATALOG).await?)
    }

    /// Whether the cached catalog is absent or past its staleness window.
    pub async fn catalog_is_stale(&self) -> Result<bool, SyncError> {
        let window = self.client.config().catalog_refresh_window;
        Ok(match self.cached_catalog().await? {
            Some(cached) => cached.meta.is_stale(Utc::now(), window),
            None => true,
        })
    }

    fn catalog_page_filters(&self) -> ServiceFilters {
        ServiceFilters {
            limit: Some(self.client.config().catalog_page_size),
            ..ServiceFilters::default()
        }
    }

    /// Reconnect handler: outbound writes go first, then the catalog is
    /// refreshed only if stale or absent.
    pub async fn on_connectivity_restored(&self) -> Result<RestoreOutcome, SyncError> {
        let upload = match self.upload_pending().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(error = %e, "upload on reconnect failed; mutations remain queued");
                None
            }
        };

        let catalog_refreshed = if self.catalog_is_stale().await? {
            self.download_services(&self.catalog_page_filters()).await?;
            true
        } else {
            false
        };

        Ok(RestoreOutcome {
            upload,
            catalog_refreshed,
        })
    }

    /// Deterministic three-step sync: upload pending, download profile,
    /// download one catalog page.
    pub async fn perform_full_sync(&self) -> FullSyncReport {
        let upload = self.upload_pending().await;
        let profile = self.download_profile().await;
        let catalog = self.download_services(&self.catalog_page_filters()).await;

        let report = FullSyncReport {
            upload,
            profile,
            catalog,
        };
        tracing::info!(success = report.success(), "full sync finished");
        report
    }
}
