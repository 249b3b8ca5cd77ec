use super::*;

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use saastf_api::ClientConfig;
use saastf_core::test_utils::{MemoryBackend, token_expiring_in};
use saastf_core::{SecretBackend, SecureCredentialStore, StoreConfig, TokenManager};
use serde_json::{Value, json};

/// A server wired to a mock API and an in-memory credential slot.
pub struct TestEnv {
    pub api: mockito::ServerGuard,
    pub backend: Arc<MemoryBackend>,
    pub server: SaasTfMcp,
}

impl TestEnv {
    /// No credential stored.
    pub async fn signed_out() -> Self {
        Self::with_secret(None).await
    }

    /// A credential valid for another hour is stored.
    pub async fn signed_in() -> Self {
        Self::with_secret(Some(valid_token())).await
    }

    pub async fn with_secret(secret: Option<String>) -> Self {
        let api = mockito::Server::new_async().await;

        let backend = Arc::new(MemoryBackend::named("file"));
        if let Some(secret) = secret {
            backend.set_secret(&secret).await;
        }

        let store = SecureCredentialStore::new(
            None,
            Arc::clone(&backend) as Arc<dyn SecretBackend>,
            Duration::from_secs(5),
        )
        .await;
        let tokens = Arc::new(TokenManager::new(
            Arc::new(store),
            &StoreConfig::default(),
        ));
        let config = ClientConfig::default()
            .with_base_url(api.url())
            .with_timeout(Duration::from_secs(5));
        let client = SaasTfClient::new(config, tokens).unwrap();

        Self {
            api,
            backend,
            server: SaasTfMcp::new(Arc::new(client)),
        }
    }

    /// Stored credential, if any.
    pub async fn stored_secret(&self) -> Option<String> {
        self.backend.secret().await
    }
}

pub fn valid_token() -> String {
    token_expiring_in(Utc::now(), TimeDelta::hours(1))
}

pub fn user_json() -> Value {
    json!({
        "id": "user-1",
        "email": "dev@example.com",
        "firstName": "Dev",
        "createdAt": "2026-01-01T00:00:00Z"
    })
}

pub fn quota_json(used: u32, total: u32) -> Value {
    json!({
        "used": used,
        "total": total,
        "remaining": total - used,
        "plan": "FREE",
        "canCreate": used < total
    })
}

pub fn subdomain_json(id: &str, name: &str, ip: &str, active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "fullDomain": format!("{name}.saas.tf"),
        "ipAddress": ip,
        "isActive": active,
        "createdAt": "2026-02-01T00:00:00Z"
    })
}

pub fn error_json(code: &str, message: &str) -> String {
    json!({ "error": { "code": code, "message": message } }).to_string()
}

/// Text of the first content block.
pub fn text_of(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .expect("expected text content in result")
}

pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}
