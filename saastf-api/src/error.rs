use serde::{Deserialize, Serialize};

/// Stable error codes reported by the saas.tf API or synthesized locally.
///
/// The remote side may introduce new codes at any time; those are preserved
/// verbatim in [`Unrecognized`](Self::Unrecognized) instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApiErrorCode {
    /// The account has no subdomain quota left.
    QuotaExceeded,
    /// The requested subdomain name belongs to someone else.
    SubdomainTaken,
    /// The subdomain name does not follow the naming rules.
    InvalidSubdomainName,
    /// The IP address is not a valid IPv4 address.
    InvalidIpAddress,
    /// The subdomain name is on the reserved list.
    ReservedSubdomain,
    /// Missing, expired or rejected credential.
    Unauthorized,
    /// Authenticated, but not allowed to touch the resource.
    Forbidden,
    /// The resource does not exist.
    NotFound,
    /// The request body failed server-side validation.
    ValidationError,
    /// The request conflicts with existing state.
    Conflict,
    /// DNS provisioning failed on create.
    DnsCreateFailed,
    /// DNS provisioning failed on update.
    DnsUpdateFailed,
    /// DNS provisioning failed on delete.
    DnsDeleteFailed,
    /// Too many requests.
    RateLimitExceeded,
    /// No response could be obtained (connection refused, DNS failure, ...).
    NetworkError,
    /// The request did not complete within the client timeout.
    Timeout,
    /// The response could not be interpreted.
    UnknownError,
    /// The credential could not be persisted locally after a successful login.
    CredentialStoreFailed,
    /// A code this client does not know about yet.
    Unrecognized(String),
}

impl ApiErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::QuotaExceeded => "QUOTA_EXCEEDED",
            Self::SubdomainTaken => "SUBDOMAIN_TAKEN",
            Self::InvalidSubdomainName => "INVALID_SUBDOMAIN_NAME",
            Self::InvalidIpAddress => "INVALID_IP_ADDRESS",
            Self::ReservedSubdomain => "RESERVED_SUBDOMAIN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Conflict => "CONFLICT",
            Self::DnsCreateFailed => "DNS_CREATE_FAILED",
            Self::DnsUpdateFailed => "DNS_UPDATE_FAILED",
            Self::DnsDeleteFailed => "DNS_DELETE_FAILED",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::CredentialStoreFailed => "CREDENTIAL_STORE_FAILED",
            Self::Unrecognized(code) => code,
        }
    }
}

impl From<&str> for ApiErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "QUOTA_EXCEEDED" => Self::QuotaExceeded,
            "SUBDOMAIN_TAKEN" => Self::SubdomainTaken,
            "INVALID_SUBDOMAIN_NAME" => Self::InvalidSubdomainName,
            "INVALID_IP_ADDRESS" => Self::InvalidIpAddress,
            "RESERVED_SUBDOMAIN" => Self::ReservedSubdomain,
            "UNAUTHORIZED" => Self::Unauthorized,
            "FORBIDDEN" => Self::Forbidden,
            "NOT_FOUND" => Self::NotFound,
            "VALIDATION_ERROR" => Self::ValidationError,
            "CONFLICT" => Self::Conflict,
            "DNS_CREATE_FAILED" => Self::DnsCreateFailed,
            "DNS_UPDATE_FAILED" => Self::DnsUpdateFailed,
            "DNS_DELETE_FAILED" => Self::DnsDeleteFailed,
            "RATE_LIMIT_EXCEEDED" => Self::RateLimitExceeded,
            "NETWORK_ERROR" => Self::NetworkError,
            "TIMEOUT" => Self::Timeout,
            "UNKNOWN_ERROR" => Self::UnknownError,
            "CREDENTIAL_STORE_FAILED" => Self::CredentialStoreFailed,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for ApiErrorCode {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<ApiErrorCode> for String {
    fn from(code: ApiErrorCode) -> Self {
        code.as_str().to_string()
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plan the API proposes when the quota is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedPlan {
    pub name: String,
    pub quota: u32,
    pub price: String,
}

/// Upgrade hints attached to `QUOTA_EXCEEDED` errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeInfo {
    pub current_plan: String,
    pub current_quota: u32,
    #[serde(default)]
    pub suggested_plans: Vec<SuggestedPlan>,
}

/// Unified error for every call made through [`SaasTfClient`](crate::SaasTfClient).
///
/// Mirrors the API's `{ error: { code, message, timestamp?, upgradeInfo? } }`
/// envelope. Transport failures are folded into the same shape with the
/// `TIMEOUT`, `NETWORK_ERROR` and `UNKNOWN_ERROR` codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {message}")]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_info: Option<UpgradeInfo>,
    /// HTTP status of the response, when there was one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            timestamp: None,
            upgrade_info: None,
            status: None,
        }
    }

    pub fn timeout() -> Self {
        Self::new(ApiErrorCode::Timeout, "Request timed out. Please try again.")
    }

    pub fn network() -> Self {
        Self::new(
            ApiErrorCode::NetworkError,
            "Network error. Please check your connection.",
        )
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::UnknownError, message)
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// The remote side rejected the credential (HTTP 401 or an `UNAUTHORIZED` code).
    pub fn is_unauthorized(&self) -> bool {
        self.code == ApiErrorCode::Unauthorized || self.status == Some(401)
    }

    /// Whether it is expected behavior (user input, quota, missing resource), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self.code,
            ApiErrorCode::QuotaExceeded
                | ApiErrorCode::SubdomainTaken
                | ApiErrorCode::InvalidSubdomainName
                | ApiErrorCode::InvalidIpAddress
                | ApiErrorCode::ReservedSubdomain
                | ApiErrorCode::Unauthorized
                | ApiErrorCode::Forbidden
                | ApiErrorCode::NotFound
                | ApiErrorCode::ValidationError
                | ApiErrorCode::Conflict
                | ApiErrorCode::RateLimitExceeded
        )
    }
}

/// Result alias for API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip_through_strings() {
        for code in [
            ApiErrorCode::QuotaExceeded,
            ApiErrorCode::SubdomainTaken,
            ApiErrorCode::Unauthorized,
            ApiErrorCode::DnsDeleteFailed,
            ApiErrorCode::Timeout,
        ] {
            assert_eq!(ApiErrorCode::from(code.as_str()), code);
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        let code = ApiErrorCode::from("PAYMENT_REQUIRED");
        assert_eq!(code, ApiErrorCode::Unrecognized("PAYMENT_REQUIRED".to_string()));
        assert_eq!(code.to_string(), "PAYMENT_REQUIRED");
    }

    #[test]
    fn deserializes_structured_error_body() {
        let json = serde_json::json!({
            "code": "QUOTA_EXCEEDED",
            "message": "Limit reached",
            "upgradeInfo": {
                "currentPlan": "FREE",
                "currentQuota": 2,
                "suggestedPlans": [{ "name": "PACKAGE_5", "quota": 7, "price": "$10/year" }]
            }
        });
        let error: ApiError = serde_json::from_value(json).unwrap();
        assert_eq!(error.code, ApiErrorCode::QuotaExceeded);
        let upgrade = error.upgrade_info.unwrap();
        assert_eq!(upgrade.current_quota, 2);
        assert_eq!(upgrade.suggested_plans[0].name, "PACKAGE_5");
    }

    #[test]
    fn unauthorized_is_detected_from_status_or_code() {
        assert!(ApiError::new(ApiErrorCode::Unauthorized, "x").is_unauthorized());
        assert!(ApiError::unknown("x").with_status(401).is_unauthorized());
        assert!(!ApiError::unknown("x").with_status(500).is_unauthorized());
        assert!(!ApiError::new(ApiErrorCode::Forbidden, "x").is_unauthorized());
    }
}
