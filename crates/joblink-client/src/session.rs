//! Session state
//!
//! Owns the access/refresh token pair on behalf of the pipeline: reads
//! and writes go through the local store so a restarted process picks the
//! session back up. The refresh mutex serializes refresh attempts;
//! concurrent 401 handlers queue on it and re-read the stored tokens
//! before deciding whether a refresh is still needed.

use std::sync::Arc;

use tokio::sync::Mutex;

use joblink_core::models::AuthTokens;
use joblink_store::{get_json, keys, set_json, Store};

use crate::error::ClientError;

pub struct SessionManager {
    store: Arc<dyn Store>,
    refresh_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Current token pair, or `None` when logged out.
    pub async fn tokens(&self) -> Result<Option<AuthTokens>, ClientError> {
        let access: Option<String> = get_json(self.store.as_ref(), keys::ACCESS_TOKEN).await?;
        let refresh: Option<String> = get_json(self.store.as_ref(), keys::REFRESH_TOKEN).await?;
        Ok(match (access, refresh) {
            (Some(access), Some(refresh)) => Some(AuthTokens { access, refresh }),
            _ => None,
        })
    }

    /// Persist a new token pair and mark the session logged in.
    pub async fn store_tokens(&self, tokens: &AuthTokens) -> Result<(), ClientError> {
        set_json(self.store.as_ref(), keys::ACCESS_TOKEN, &tokens.access).await?;
        set_json(self.store.as_ref(), keys::REFRESH_TOKEN, &tokens.refresh).await?;
        set_json(self.store.as_ref(), keys::LOGGED_IN, &true).await?;
        Ok(())
    }

    /// Clear all local authentication state.
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.store.delete(keys::ACCESS_TOKEN).await?;
        self.store.delete(keys::REFRESH_TOKEN).await?;
        self.store.delete(keys::LOGGED_IN).await?;
        tracing::info!("local session cleared");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool, ClientError> {
        let flag: Option<bool> = get_json(self.store.as_ref(), keys::LOGGED_IN).await?;
        Ok(flag.unwrap_or(false))
    }

    /// Serialize refresh attempts. The guard must be held for the full
    /// refresh exchange so concurrent expirations share one result.
    pub async fn refresh_guard(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.refresh_lock.lock().await
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}
