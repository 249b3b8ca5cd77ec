//! saas.tf REST client and authenticated request pipeline.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiErrorCode, ApiResult};
use crate::http_client::HttpUtils;
use crate::traits::CredentialSource;
use crate::types::{
    AuthResponse, AvailabilityResponse, CheckoutRequest, CheckoutSession, CreateSubdomainRequest,
    LoginRequest, Plan, PlansEnvelope, QuotaEnvelope, QuotaInfo, RegisterRequest, Subdomain,
    SubdomainEnvelope, SubdomainList, Subscription, SubscriptionEnvelope, SubscriptionPlan,
    UpdateSubdomainRequest, User, UserEnvelope,
};

/// Production API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.saas.tf/api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for [`SaasTfClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin including the version prefix, without trailing slash.
    pub base_url: String,
    /// Whole-request timeout enforced by the transport.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("saastf-mcp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the saas.tf API.
///
/// Every call runs through the same pipeline: a usable credential is fetched
/// from the [`CredentialSource`] and attached as `Authorization: Bearer`, and
/// an HTTP 401 makes the source forget the credential before the error is
/// returned. Calls are never retried here.
pub struct SaasTfClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl SaasTfClient {
    pub fn new(config: ClientConfig, credentials: Arc<dyn CredentialSource>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ApiError::unknown(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credential state shared with the pipeline.
    pub fn credentials(&self) -> &Arc<dyn CredentialSource> {
        &self.credentials
    }

    // ===== Pipeline =====

    async fn execute(&self, method: Method, path: &str, body: Option<String>) -> ApiResult<String> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);

        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        match self.credentials.valid_token().await {
            Some(token) => request = request.bearer_auth(token),
            None => log::debug!("No credential available, sending {method} {path} unauthenticated"),
        }

        let (status, text) = HttpUtils::execute_request(request, method.as_str(), path).await?;
        if (200..300).contains(&status) {
            return Ok(text);
        }

        let error = HttpUtils::error_from_response(status, &text);
        if status == 401 {
            log::warn!("{method} {path} rejected the credential, clearing it");
            self.credentials.clear_token().await;
        } else if error.is_expected() {
            log::warn!("{method} {path} failed: {error}");
        } else {
            log::error!("{method} {path} failed: {error}");
        }
        Err(error)
    }

    fn encode_body<B: Serialize>(body: &B) -> ApiResult<String> {
        serde_json::to_string(body)
            .map_err(|e| ApiError::unknown(format!("Failed to encode request body: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let text = self.execute(Method::GET, path, None).await?;
        HttpUtils::parse_json(&text)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = Self::encode_body(body)?;
        let text = self.execute(method, path, Some(body)).await?;
        HttpUtils::parse_json(&text)
    }

    // ===== Authentication =====

    /// Create an account and keep the issued credential.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> ApiResult<User> {
        let body = RegisterRequest {
            email,
            password,
            first_name,
            last_name,
        };
        let response: AuthResponse = self
            .send_json(Method::POST, "/auth/register", &body)
            .await?;
        self.credentials.store_token(&response.token).await?;
        log::info!("Registered new account {}", response.user.id);
        Ok(response.user)
    }

    /// Exchange email/password for a credential and keep it.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let body = LoginRequest { email, password };
        let response: AuthResponse = self.send_json(Method::POST, "/auth/login", &body).await?;
        self.credentials.store_token(&response.token).await?;
        log::info!("Logged in as {}", response.user.id);
        Ok(response.user)
    }

    pub async fn get_current_user(&self) -> ApiResult<User> {
        let envelope: UserEnvelope = self.get("/auth/me").await?;
        Ok(envelope.user)
    }

    /// Notify the server, then drop the local credential whatever the outcome.
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self.execute(Method::POST, "/auth/logout", None).await;
        self.credentials.clear_token().await;
        result.map(|_| ())
    }

    // ===== Subdomains =====

    pub async fn check_availability(&self, name: &str) -> ApiResult<AvailabilityResponse> {
        self.get(&format!("/subdomains/check/{}", urlencoding::encode(name)))
            .await
    }

    pub async fn list_subdomains(&self) -> ApiResult<SubdomainList> {
        self.get("/subdomains").await
    }

    pub async fn create_subdomain(&self, name: &str, ip_address: &str) -> ApiResult<Subdomain> {
        let body = CreateSubdomainRequest { name, ip_address };
        let envelope: SubdomainEnvelope = self.send_json(Method::POST, "/subdomains", &body).await?;
        Ok(envelope.subdomain)
    }

    pub async fn update_subdomain(&self, id: &str, ip_address: &str) -> ApiResult<Subdomain> {
        let body = UpdateSubdomainRequest { ip_address };
        let envelope: SubdomainEnvelope = self
            .send_json(
                Method::PATCH,
                &format!("/subdomains/{}", urlencoding::encode(id)),
                &body,
            )
            .await?;
        Ok(envelope.subdomain)
    }

    pub async fn delete_subdomain(&self, id: &str) -> ApiResult<()> {
        self.execute(
            Method::DELETE,
            &format!("/subdomains/{}", urlencoding::encode(id)),
            None,
        )
        .await
        .map(|_| ())
    }

    // ===== Subscriptions =====

    pub async fn get_quota(&self) -> ApiResult<QuotaInfo> {
        let envelope: QuotaEnvelope = self.get("/subscriptions/quota").await?;
        Ok(envelope.quota)
    }

    pub async fn get_plans(&self) -> ApiResult<Vec<Plan>> {
        let envelope: PlansEnvelope = self.get("/subscriptions/plans").await?;
        Ok(envelope.plans)
    }

    pub async fn create_checkout(&self, plan: SubscriptionPlan) -> ApiResult<CheckoutSession> {
        self.send_json(
            Method::POST,
            "/subscriptions/checkout",
            &CheckoutRequest { plan },
        )
        .await
    }

    /// Current paid subscription; `None` for accounts on the free tier.
    pub async fn get_current_subscription(&self) -> ApiResult<Option<Subscription>> {
        match self.get::<SubscriptionEnvelope>("/subscriptions/current").await {
            Ok(envelope) => Ok(envelope.subscription),
            Err(e) if e.code == ApiErrorCode::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
