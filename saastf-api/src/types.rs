//! Wire types for the saas.tf REST API (camelCase JSON).

use serde::{Deserialize, Serialize};

/// Account profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// First name when known, otherwise the email address.
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// A provisioned subdomain (`<name>.saas.tf` → IPv4 A record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subdomain {
    pub id: String,
    pub name: String,
    pub full_domain: String,
    pub ip_address: String,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Paid subscription details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub plan: String,
    pub status: String,
    pub quota: u32,
    #[serde(default)]
    pub current_period_start: Option<String>,
    #[serde(default)]
    pub current_period_end: Option<String>,
}

/// Subdomain quota usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaInfo {
    pub used: u32,
    pub total: u32,
    pub remaining: u32,
    pub plan: String,
    #[serde(default)]
    pub can_create: bool,
}

/// A purchasable plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub name: String,
    pub price: String,
    pub quota: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Result of a name availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
}

/// Checkout session for a plan upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub checkout_url: String,
    pub session_id: String,
}

/// Successful login/register response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Subdomains together with the quota they consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainList {
    pub subdomains: Vec<Subdomain>,
    pub quota: QuotaInfo,
}

/// Plans that can be bought through checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionPlan {
    #[serde(rename = "PACKAGE_5")]
    Package5,
    #[serde(rename = "PACKAGE_50")]
    Package50,
}

impl SubscriptionPlan {
    pub const ALL: [Self; 2] = [Self::Package5, Self::Package50];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Package5 => "PACKAGE_5",
            Self::Package50 => "PACKAGE_50",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Package5 => "5 Subdomains Package ($10/year)",
            Self::Package50 => "50 Subdomains Package ($50/year)",
        }
    }
}

impl std::str::FromStr for SubscriptionPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|plan| plan.as_str() == s)
            .ok_or_else(|| format!("Invalid plan: {s}"))
    }
}

impl std::fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Request bodies =====

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSubdomainRequest<'a> {
    pub name: &'a str,
    pub ip_address: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateSubdomainRequest<'a> {
    pub ip_address: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckoutRequest {
    pub plan: SubscriptionPlan,
}

// ===== Response envelopes =====

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubdomainEnvelope {
    pub subdomain: Subdomain,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuotaEnvelope {
    pub quota: QuotaInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlansEnvelope {
    pub plans: Vec<Plan>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubscriptionEnvelope {
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdomain_list_deserializes_camel_case() {
        let json = serde_json::json!({
            "subdomains": [{
                "id": "s1",
                "name": "myapp",
                "fullDomain": "myapp.saas.tf",
                "ipAddress": "1.2.3.4",
                "isActive": true,
                "createdAt": "2025-01-01T00:00:00Z"
            }],
            "quota": { "used": 1, "total": 2, "remaining": 1, "plan": "FREE", "canCreate": true }
        });
        let list: SubdomainList = serde_json::from_value(json).unwrap();
        assert_eq!(list.subdomains[0].full_domain, "myapp.saas.tf");
        assert!(list.subdomains[0].expires_at.is_none());
        assert!(list.quota.can_create);
    }

    #[test]
    fn plan_parses_from_wire_name() {
        assert_eq!("PACKAGE_5".parse::<SubscriptionPlan>(), Ok(SubscriptionPlan::Package5));
        assert!("PACKAGE_500".parse::<SubscriptionPlan>().is_err());
        assert_eq!(
            serde_json::to_value(CheckoutRequest { plan: SubscriptionPlan::Package50 }).unwrap(),
            serde_json::json!({ "plan": "PACKAGE_50" })
        );
    }

    #[test]
    fn register_request_omits_missing_names() {
        let body = RegisterRequest {
            email: "a@b.io",
            password: "secret123",
            first_name: Some("Ada"),
            last_name: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("lastName").is_none());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let user = User {
            id: "u".into(),
            email: "a@b.io".into(),
            first_name: None,
            last_name: None,
            created_at: None,
        };
        assert_eq!(user.display_name(), "a@b.io");
    }
}
