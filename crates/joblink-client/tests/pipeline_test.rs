//! End-to-end pipeline behavior against a scripted transport: token
//! refresh-and-retry, error classification, and multipart parity.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use joblink_client::testing::MockTransport;
use joblink_client::{ApiClient, TransportError};
use joblink_core::models::AuthTokens;
use joblink_core::{ClientConfig, ErrorKind};
use joblink_store::MemoryStore;

fn expired_body() -> Value {
    json!({"code": "token_not_valid", "detail": "Given token not valid for any token type"})
}

fn profile_body() -> Value {
    json!({"message": "ok", "data": {"id": "1"}, "statusCode": 200})
}

async fn logged_in_client() -> (Arc<MockTransport>, ApiClient) {
    let transport = Arc::new(MockTransport::new());
    let client = ApiClient::new(
        ClientConfig::default(),
        transport.clone(),
        Arc::new(MemoryStore::new()),
    );
    client
        .session()
        .store_tokens(&AuthTokens {
            access: "a1".to_string(),
            refresh: "r1".to_string(),
        })
        .await
        .unwrap();
    (transport, client)
}

fn auth_header(request: &joblink_client::TransportRequest) -> Option<&str> {
    request
        .headers
        .iter()
        .find(|(name, _)| name == "Authorization")
        .map(|(_, value)| value.as_str())
}

#[tokio::test]
async fn expired_401_triggers_exactly_one_refresh_and_retry() {
    let (transport, client) = logged_in_client().await;
    transport.push_json(401, expired_body());
    transport.push_json(200, json!({"access": "a2", "refresh": "r2"}));
    transport.push_json(200, profile_body());

    let envelope = client.get::<Value>("/api/profile/", &[]).await.unwrap();

    assert!(envelope.success);
    assert_eq!(envelope.data.value().unwrap()["id"], "1");

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(auth_header(&requests[0]), Some("Bearer a1"));
    assert!(requests[1].url.ends_with("/api/auth/token/refresh/"));
    assert_eq!(auth_header(&requests[1]), None);
    assert_eq!(auth_header(&requests[2]), Some("Bearer a2"));

    // The rotated pair is persisted.
    let tokens = client.session().tokens().await.unwrap().unwrap();
    assert_eq!(tokens.access, "a2");
    assert_eq!(tokens.refresh, "r2");
}

#[tokio::test]
async fn refresh_without_rotation_keeps_old_refresh_token() {
    let (transport, client) = logged_in_client().await;
    transport.push_json(401, expired_body());
    transport.push_json(200, json!({"access": "a2"}));
    transport.push_json(200, profile_body());

    let envelope = client.get::<Value>("/api/profile/", &[]).await.unwrap();
    assert!(envelope.success);

    let tokens = client.session().tokens().await.unwrap().unwrap();
    assert_eq!(tokens.access, "a2");
    assert_eq!(tokens.refresh, "r1");
}

#[tokio::test]
async fn non_signature_401_is_returned_unchanged_without_refresh() {
    let (transport, client) = logged_in_client().await;
    transport.push_json(
        401,
        json!({"detail": "Authentication credentials were not provided."}),
    );

    let envelope = client.get::<Value>("/api/profile/", &[]).await.unwrap();

    assert!(!envelope.success);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::AuthDenied));
    assert_eq!(
        envelope.message,
        "Authentication credentials were not provided."
    );
    assert_eq!(transport.request_count(), 1);

    // Session untouched.
    assert!(client.session().tokens().await.unwrap().is_some());
}

#[tokio::test]
async fn refresh_failure_clears_session_and_reports_expiry() {
    let (transport, client) = logged_in_client().await;
    transport.push_json(401, expired_body());
    transport.push_json(401, json!({"detail": "Token is invalid or expired"}));

    let envelope = client.get::<Value>("/api/profile/", &[]).await.unwrap();

    assert!(!envelope.success);
    assert_eq!(envelope.message, "Session expired");
    assert_eq!(envelope.error_kind(), Some(ErrorKind::AuthExpired));
    assert_eq!(transport.request_count(), 2);
    assert!(client.session().tokens().await.unwrap().is_none());
    assert!(!client.session().is_logged_in().await.unwrap());
}

#[tokio::test]
async fn retry_result_is_returned_without_second_refresh() {
    let (transport, client) = logged_in_client().await;
    transport.push_json(401, expired_body());
    transport.push_json(200, json!({"access": "a2"}));
    transport.push_json(500, json!({"detail": "boom"}));

    let envelope = client.get::<Value>("/api/profile/", &[]).await.unwrap();

    assert!(!envelope.success);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::Server));
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn retry_hitting_another_expired_401_stops_there() {
    let (transport, client) = logged_in_client().await;
    transport.push_json(401, expired_body());
    transport.push_json(200, json!({"access": "a2"}));
    transport.push_json(401, expired_body());

    let envelope = client.get::<Value>("/api/profile/", &[]).await.unwrap();

    assert!(!envelope.success);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::AuthExpired));
    // original + refresh + retry, never a second refresh
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn transport_fault_synthesizes_network_envelope() {
    let (transport, client) = logged_in_client().await;
    transport.push_error(TransportError::Timeout);

    let envelope = client.get::<Value>("/api/profile/", &[]).await.unwrap();

    assert!(!envelope.success);
    assert_eq!(envelope.status_code, 500);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::Network));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn multipart_upload_gets_the_same_refresh_and_retry() {
    let (transport, client) = logged_in_client().await;
    transport.push_json(401, expired_body());
    transport.push_json(200, json!({"access": "a2"}));
    transport.push_json(
        200,
        json!({
            "id": "7b2e9f9c-92a8-4b5e-9a31-0a41e1a0b001",
            "url": "https://cdn.joblink.example/a.jpg",
            "filename": "a.jpg",
            "content_type": "image/jpeg",
            "size": 3,
            "uploaded_at": "2026-08-01T10:00:00Z"
        }),
    );

    let envelope = client
        .upload_attachment("a.jpg", "image/jpeg", vec![1, 2, 3], Vec::new())
        .await
        .unwrap();

    assert!(envelope.success);
    assert_eq!(envelope.data.value().unwrap().filename, "a.jpg");

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert!(matches!(
        requests[2].body,
        joblink_client::RequestBody::Multipart(_)
    ));
    assert_eq!(auth_header(&requests[2]), Some("Bearer a2"));
}

#[tokio::test]
async fn login_persists_token_pair() {
    let transport = Arc::new(MockTransport::new());
    let client = ApiClient::new(
        ClientConfig::default(),
        transport.clone(),
        Arc::new(MemoryStore::new()),
    );
    transport.push_json(200, json!({"access": "a1", "refresh": "r1"}));

    let envelope = client.login("user@example.com", "hunter2").await.unwrap();

    assert!(envelope.success);
    let tokens = client.session().tokens().await.unwrap().unwrap();
    assert_eq!(tokens.access, "a1");
    assert_eq!(tokens.refresh, "r1");
    assert!(client.session().is_logged_in().await.unwrap());

    client.logout().await.unwrap();
    assert!(client.session().tokens().await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_expirations_share_one_refresh() {
    let (transport, client) = logged_in_client().await;
    let client = Arc::new(client);

    // Both originals are held in flight long enough to overlap, then both
    // callers race to refresh. Only one refresh response is scripted: a
    // second refresh attempt would drain the script and fail the test.
    transport.push_json_delayed(401, expired_body(), Duration::from_millis(50));
    transport.push_json_delayed(401, expired_body(), Duration::from_millis(50));
    transport.push_json(200, json!({"access": "a2", "refresh": "r2"}));
    transport.push_json(200, profile_body());
    transport.push_json(200, profile_body());

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.get::<Value>("/api/profile/", &[]).await.unwrap() })
    };
    let second = {
        let client = client.clone();
        tokio::spawn(async move { client.get::<Value>("/api/profile/", &[]).await.unwrap() })
    };

    let first = first.await.unwrap();
    let second = second.await.unwrap();

    assert!(first.success);
    assert!(second.success);
    // 2 originals + 1 shared refresh + 2 retries
    assert_eq!(transport.request_count(), 5);
}
