//! Configuration module
//!
//! Client configuration read from the environment, with defaults suitable
//! for local development against a dev API server.

use std::env;
use std::time::Duration;

// Common constants
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CATALOG_REFRESH_WINDOW_SECS: i64 = 3600;
const DEFAULT_QUEUE_CAPACITY: usize = 500;
const DEFAULT_CATALOG_PAGE_SIZE: u32 = 50;

/// Client configuration shared by the pipeline, queue, and orchestrator.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API origin, e.g. `https://api.joblink.example`.
    pub base_url: String,
    /// Upper bound for a single network exchange.
    pub request_timeout: Duration,
    /// Maximum age of the cached catalog before it must be re-downloaded,
    /// used when the server does not send `expires_after`.
    pub catalog_refresh_window: chrono::Duration,
    /// Per-collection cap on queued offline mutations.
    pub queue_capacity: usize,
    /// Page size requested during a full sync catalog download.
    pub catalog_page_size: u32,
    pub environment: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            catalog_refresh_window: chrono::Duration::seconds(DEFAULT_CATALOG_REFRESH_WINDOW_SECS),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            catalog_page_size: DEFAULT_CATALOG_PAGE_SIZE,
            environment: "development".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let base_url = env::var("JOBLINK_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let request_timeout_secs = env::var("JOBLINK_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let catalog_refresh_window_secs = env::var("JOBLINK_CATALOG_REFRESH_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CATALOG_REFRESH_WINDOW_SECS);

        let queue_capacity = env::var("JOBLINK_QUEUE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);

        let catalog_page_size = env::var("JOBLINK_CATALOG_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CATALOG_PAGE_SIZE);

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let config = Self {
            base_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            catalog_refresh_window: chrono::Duration::seconds(catalog_refresh_window_secs),
            queue_capacity,
            catalog_page_size,
            environment,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }
        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than zero");
        }
        if self.catalog_refresh_window <= chrono::Duration::zero() {
            anyhow::bail!("catalog_refresh_window must be greater than zero");
        }
        if self.queue_capacity == 0 {
            anyhow::bail!("queue_capacity must be greater than zero");
        }
        if self.catalog_page_size == 0 {
            anyhow::bail!("catalog_page_size must be greater than zero");
        }
        Ok(())
    }

    /// Check if the client is running against a production environment
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.queue_capacity, 500);
        assert!(!config.is_production());
    }

    #[test]
    fn rejects_invalid_base_url() {
        let config = ClientConfig {
            base_url: "ftp://example.com".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_queue_capacity() {
        let config = ClientConfig {
            queue_capacity: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn production_detection() {
        let config = ClientConfig {
            environment: "Production".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.is_production());
    }
}
