//! Resilient request pipeline
//!
//! Builds authenticated requests, executes them through the transport
//! under a bounded timeout, and recovers transparently from expired
//! access tokens: a 401 matching the expiry signature triggers one
//! refresh exchange and one retry of the original request, never more.
//! Multipart uploads go through the same path and get the same recovery.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use joblink_core::models::{AuthTokens, RefreshRequest, RefreshResponse};
use joblink_core::ClientConfig;
use joblink_store::Store;

use crate::error::ClientError;
use crate::response::{matches_token_expiry, normalize, ResponseEnvelope};
use crate::session::SessionManager;
use crate::transport::{
    HttpMethod, MultipartPayload, RequestBody, Transport, TransportRequest,
};

const AUTH_REFRESH_PATH: &str = "/api/auth/token/refresh/";

/// Per-request options for [`ApiClient::execute`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Attach the stored bearer token. Calling an authenticated endpoint
    /// with no stored session is a local error, not a 401.
    pub authenticated: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            query: Vec::new(),
            body: RequestBody::Empty,
            authenticated: true,
        }
    }
}

/// HTTP client for the JobLink API with transparent token refresh.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionManager>,
    config: ClientConfig,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, store: Arc<dyn Store>) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            transport,
            session: Arc::new(SessionManager::new(store)),
            config,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let encoded: Vec<String> = query
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&encoded.join("&"));
        }
        url
    }

    fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
        access_token: Option<&str>,
    ) -> TransportRequest {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if !matches!(options.body, RequestBody::Multipart(_)) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = access_token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        TransportRequest {
            method,
            url: self.build_url(path, &options.query),
            headers,
            body: options.body.clone(),
            timeout: self.config.request_timeout,
        }
    }

    /// Execute one request and normalize the outcome.
    ///
    /// Every network outcome comes back as `Ok(envelope)`, including
    /// transport faults (synthesized status 500). `Err` is reserved for
    /// local faults: store access, serialization, missing session.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<T>, ClientError> {
        let tokens = if options.authenticated {
            match self.session.tokens().await? {
                Some(tokens) => Some(tokens),
                None => return Err(ClientError::NotLoggedIn),
            }
        } else {
            None
        };

        let request = self.build_request(method, path, &options, tokens.as_ref().map(|t| t.access.as_str()));
        tracing::debug!(method = %method, path = %path, "issuing request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "transport fault");
                return Ok(ResponseEnvelope::network_error(e.to_string()));
            }
        };

        if response.status == 401 && options.authenticated {
            let expired = serde_json::from_slice::<Value>(&response.body)
                .map(|body| matches_token_expiry(&body))
                .unwrap_or(false);
            if expired {
                let used_access = tokens.map(|t| t.access).unwrap_or_default();
                return self.refresh_and_retry(method, path, &options, &used_access).await;
            }
        }

        Ok(normalize(response.status, &response.body))
    }

    /// One refresh exchange, then one retry of the original request. The
    /// retry's result is returned regardless of outcome.
    async fn refresh_and_retry<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
        used_access: &str,
    ) -> Result<ResponseEnvelope<T>, ClientError> {
        let tokens = match self.fresh_tokens(used_access).await? {
            Some(tokens) => tokens,
            None => return Ok(ResponseEnvelope::session_expired()),
        };

        let retry = self.build_request(method, path, options, Some(&tokens.access));
        tracing::debug!(method = %method, path = %path, "retrying with refreshed token");

        match self.transport.execute(retry).await {
            Ok(response) => Ok(normalize(response.status, &response.body)),
            Err(e) => Ok(ResponseEnvelope::network_error(e.to_string())),
        }
    }

    /// Single-flight token refresh. Concurrent expirations queue on the
    /// session's refresh guard; whoever acquires it after a completed
    /// refresh sees a changed access token and reuses it instead of
    /// spending the refresh token again.
    async fn fresh_tokens(&self, used_access: &str) -> Result<Option<AuthTokens>, ClientError> {
        let _guard = self.session.refresh_guard().await;

        let current = match self.session.tokens().await? {
            Some(current) => current,
            // A concurrent flight already failed its refresh and cleared
            // the session.
            None => return Ok(None),
        };
        if current.access != used_access {
            return Ok(Some(current));
        }

        let body = serde_json::to_value(RefreshRequest {
            refresh: current.refresh.clone(),
        })?;
        let request = TransportRequest {
            method: HttpMethod::Post,
            url: self.build_url(AUTH_REFRESH_PATH, &[]),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: RequestBody::Json(body),
            timeout: self.config.request_timeout,
        };

        let envelope: ResponseEnvelope<RefreshResponse> = match self.transport.execute(request).await
        {
            Ok(response) => normalize(response.status, &response.body),
            Err(e) => {
                tracing::warn!(error = %e, "token refresh transport fault");
                self.session.clear().await?;
                return Ok(None);
            }
        };

        match envelope.data.into_value() {
            Some(refreshed) if envelope.success => {
                let tokens = AuthTokens {
                    access: refreshed.access,
                    refresh: refreshed.refresh.unwrap_or(current.refresh),
                };
                self.session.store_tokens(&tokens).await?;
                tracing::debug!("access token refreshed");
                Ok(Some(tokens))
            }
            _ => {
                tracing::warn!(status = envelope.status_code, "token refresh rejected; clearing session");
                self.session.clear().await?;
                Ok(None)
            }
        }
    }

    // Generic verb helpers

    /// GET with optional query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ResponseEnvelope<T>, ClientError> {
        let options = RequestOptions {
            query: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ..RequestOptions::default()
        };
        self.execute(HttpMethod::Get, path, options).await
    }

    /// POST a JSON body.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseEnvelope<T>, ClientError> {
        let options = RequestOptions {
            body: RequestBody::Json(serde_json::to_value(body)?),
            ..RequestOptions::default()
        };
        self.execute(HttpMethod::Post, path, options).await
    }

    /// POST a JSON body without attaching a bearer token.
    pub async fn post_json_public<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseEnvelope<T>, ClientError> {
        let options = RequestOptions {
            body: RequestBody::Json(serde_json::to_value(body)?),
            authenticated: false,
            ..RequestOptions::default()
        };
        self.execute(HttpMethod::Post, path, options).await
    }

    /// PUT a JSON body.
    pub async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseEnvelope<T>, ClientError> {
        let options = RequestOptions {
            body: RequestBody::Json(serde_json::to_value(body)?),
            ..RequestOptions::default()
        };
        self.execute(HttpMethod::Put, path, options).await
    }

    /// PATCH a JSON body.
    pub async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseEnvelope<T>, ClientError> {
        let options = RequestOptions {
            body: RequestBody::Json(serde_json::to_value(body)?),
            ..RequestOptions::default()
        };
        self.execute(HttpMethod::Patch, path, options).await
    }

    /// DELETE.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ResponseEnvelope<T>, ClientError> {
        self.execute(HttpMethod::Delete, path, RequestOptions::default())
            .await
    }

    /// POST a multipart form. Same auth, timeout, and refresh-and-retry
    /// rules as the JSON verbs.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: MultipartPayload,
    ) -> Result<ResponseEnvelope<T>, ClientError> {
        let options = RequestOptions {
            body: RequestBody::Multipart(payload),
            ..RequestOptions::default()
        };
        self.execute(HttpMethod::Post, path, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joblink_store::MemoryStore;

    fn client() -> ApiClient {
        let config = ClientConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ClientConfig::default()
        };
        ApiClient::new(
            config,
            Arc::new(crate::testing::MockTransport::new()),
            Arc::new(MemoryStore::new()),
        )
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(client().base_url(), "http://localhost:8000");
    }

    #[test]
    fn build_url_encodes_query() {
        let client = client();
        let url = client.build_url(
            "/api/services/",
            &[("q".to_string(), "deep clean".to_string())],
        );
        assert_eq!(url, "http://localhost:8000/api/services/?q=deep%20clean");
    }

    #[test]
    fn json_requests_carry_json_headers() {
        let client = client();
        let request = client.build_request(
            HttpMethod::Post,
            "/api/bids/",
            &RequestOptions {
                body: RequestBody::Json(serde_json::json!({})),
                ..RequestOptions::default()
            },
            Some("tok"),
        );
        assert!(request
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string())));
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "Bearer tok".to_string())));
    }

    #[test]
    fn multipart_requests_omit_json_content_type() {
        let client = client();
        let request = client.build_request(
            HttpMethod::Post,
            "/api/attachments/",
            &RequestOptions {
                body: RequestBody::Multipart(MultipartPayload::default()),
                ..RequestOptions::default()
            },
            None,
        );
        assert!(!request
            .headers
            .iter()
            .any(|(name, _)| name == "Content-Type"));
        assert!(request
            .headers
            .contains(&("Accept".to_string(), "application/json".to_string())));
    }

    #[tokio::test]
    async fn authenticated_call_without_session_is_local_error() {
        let client = client();
        let result: Result<ResponseEnvelope<Value>, _> =
            client.get("/api/profile/", &[]).await;
        assert!(matches!(result, Err(ClientError::NotLoggedIn)));
    }
}
