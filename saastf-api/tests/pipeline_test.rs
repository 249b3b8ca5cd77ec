#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Request pipeline tests against a local mock HTTP server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mockito::Matcher;
use saastf_api::{
    ApiErrorCode, ApiResult, ClientConfig, CredentialSource, SaasTfClient, SubscriptionPlan,
};
use tokio::sync::Mutex;

/// In-memory credential source that records how often it is cleared.
#[derive(Default)]
struct MemoryCredentials {
    token: Mutex<Option<String>>,
    clears: AtomicUsize,
}

impl MemoryCredentials {
    fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
            clears: AtomicUsize::new(0),
        }
    }

    fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialSource for MemoryCredentials {
    async fn valid_token(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    async fn store_token(&self, token: &str) -> ApiResult<()> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn clear_token(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().await = None;
    }
}

fn client_for(server: &mockito::Server, credentials: Arc<MemoryCredentials>) -> SaasTfClient {
    SaasTfClient::new(
        ClientConfig::default().with_base_url(server.url()),
        credentials,
    )
    .unwrap()
}

const QUOTA_BODY: &str =
    r#"{"quota":{"used":1,"total":2,"remaining":1,"plan":"FREE","canCreate":true}}"#;

#[tokio::test]
async fn attaches_bearer_credential() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/subscriptions/quota")
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(QUOTA_BODY)
        .create_async()
        .await;

    let credentials = Arc::new(MemoryCredentials::with_token("tok-123"));
    let client = client_for(&server, Arc::clone(&credentials));

    let quota = client.get_quota().await.unwrap();
    assert_eq!(quota.remaining, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn sends_unauthenticated_without_credential() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/subdomains/check/myapp")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"available":true}"#)
        .create_async()
        .await;

    let client = client_for(&server, Arc::new(MemoryCredentials::default()));

    let result = client.check_availability("myapp").await.unwrap();
    assert!(result.available);
    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_response_purges_credential() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(401)
        .with_body(r#"{"error":{"code":"UNAUTHORIZED","message":"Token expired"}}"#)
        .create_async()
        .await;

    let credentials = Arc::new(MemoryCredentials::with_token("stale"));
    let client = client_for(&server, Arc::clone(&credentials));

    let error = client.get_current_user().await.unwrap_err();
    assert_eq!(error.code, ApiErrorCode::Unauthorized);
    assert_eq!(error.status, Some(401));
    assert_eq!(credentials.clear_count(), 1);
    assert!(credentials.valid_token().await.is_none());
}

#[tokio::test]
async fn unauthorized_without_body_still_purges() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/subdomains")
        .with_status(401)
        .create_async()
        .await;

    let credentials = Arc::new(MemoryCredentials::with_token("stale"));
    let client = client_for(&server, Arc::clone(&credentials));

    let error = client.list_subdomains().await.unwrap_err();
    assert_eq!(error.code, ApiErrorCode::UnknownError);
    assert!(error.is_unauthorized());
    assert_eq!(credentials.clear_count(), 1);
}

#[tokio::test]
async fn other_failures_leave_credential_alone() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/subdomains")
        .with_status(403)
        .with_body(r#"{"error":{"code":"QUOTA_EXCEEDED","message":"Limit reached"}}"#)
        .create_async()
        .await;

    let credentials = Arc::new(MemoryCredentials::with_token("good"));
    let client = client_for(&server, Arc::clone(&credentials));

    let error = client.create_subdomain("myapp", "1.2.3.4").await.unwrap_err();
    assert_eq!(error.code, ApiErrorCode::QuotaExceeded);
    assert_eq!(credentials.clear_count(), 0);
    assert_eq!(credentials.valid_token().await.as_deref(), Some("good"));
}

#[tokio::test]
async fn connection_failure_is_network_error() {
    let credentials = Arc::new(MemoryCredentials::with_token("good"));
    let client = SaasTfClient::new(
        ClientConfig::default().with_base_url("http://127.0.0.1:9"),
        Arc::clone(&credentials) as Arc<dyn CredentialSource>,
    )
    .unwrap();

    let error = client.get_quota().await.unwrap_err();
    assert_eq!(error.code, ApiErrorCode::NetworkError);
    assert_eq!(credentials.clear_count(), 0);
}

#[tokio::test]
async fn login_stores_issued_credential() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(serde_json::json!({
            "email": "a@b.io",
            "password": "secret123"
        })))
        .with_status(200)
        .with_body(r#"{"user":{"id":"u1","email":"a@b.io"},"token":"fresh-token"}"#)
        .create_async()
        .await;

    let credentials = Arc::new(MemoryCredentials::default());
    let client = client_for(&server, Arc::clone(&credentials));

    let user = client.login("a@b.io", "secret123").await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(credentials.valid_token().await.as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn logout_clears_even_when_server_fails() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/logout")
        .with_status(500)
        .create_async()
        .await;

    let credentials = Arc::new(MemoryCredentials::with_token("tok"));
    let client = client_for(&server, Arc::clone(&credentials));

    assert!(client.logout().await.is_err());
    assert!(credentials.valid_token().await.is_none());
}

#[tokio::test]
async fn missing_subscription_maps_to_none() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/subscriptions/current")
        .with_status(404)
        .with_body(r#"{"error":{"code":"NOT_FOUND","message":"No subscription"}}"#)
        .create_async()
        .await;

    let client = client_for(&server, Arc::new(MemoryCredentials::with_token("tok")));

    assert_eq!(client.get_current_subscription().await.unwrap(), None);
}

#[tokio::test]
async fn checkout_sends_plan_name() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/subscriptions/checkout")
        .match_body(Matcher::Json(serde_json::json!({ "plan": "PACKAGE_5" })))
        .with_status(200)
        .with_body(r#"{"checkoutUrl":"https://pay.example/cs_1","sessionId":"cs_1"}"#)
        .create_async()
        .await;

    let client = client_for(&server, Arc::new(MemoryCredentials::with_token("tok")));

    let session = client
        .create_checkout(SubscriptionPlan::Package5)
        .await
        .unwrap();
    assert_eq!(session.session_id, "cs_1");
    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_success_body_is_unknown_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/subscriptions/plans")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let credentials = Arc::new(MemoryCredentials::with_token("tok"));
    let client = client_for(&server, Arc::clone(&credentials));

    let error = client.get_plans().await.unwrap_err();
    assert_eq!(error.code, ApiErrorCode::UnknownError);
    assert_eq!(credentials.clear_count(), 0);
}
