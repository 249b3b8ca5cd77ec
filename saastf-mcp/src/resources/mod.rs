//! Read-only MCP resources: the usage guide and the signed-in user's data.

mod documentation;

use saastf_api::{ApiError, ApiResult, QuotaInfo, SaasTfClient, Subscription, User};
use serde_json::{Value, json};

pub use documentation::DOCUMENTATION;

pub const DOCUMENTATION_URI: &str = "saastf://documentation";
pub const PROFILE_URI: &str = "saastf://user/profile";
pub const SUBDOMAINS_URI: &str = "saastf://user/subdomains";

/// Static description of a listed resource.
pub struct ResourceSpec {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

pub const RESOURCES: [ResourceSpec; 3] = [
    ResourceSpec {
        uri: DOCUMENTATION_URI,
        name: "saas.tf Documentation",
        description: "Plans, naming rules and a walkthrough of the saas.tf tools",
        mime_type: "text/markdown",
    },
    ResourceSpec {
        uri: PROFILE_URI,
        name: "Your saas.tf Profile",
        description: "Account details, subscription and quota of the signed-in user",
        mime_type: "application/json",
    },
    ResourceSpec {
        uri: SUBDOMAINS_URI,
        name: "Your Subdomains",
        description: "All subdomains of the signed-in user with quota and a summary",
        mime_type: "application/json",
    },
];

/// Account, subscription (FREE when there is none) and quota.
///
/// Failures are reported inside the document rather than as protocol errors.
pub async fn user_profile(client: &SaasTfClient) -> Value {
    match load_profile(client).await {
        Ok((user, subscription, quota)) => json!({
            "user": {
                "id": user.id,
                "email": user.email,
                "firstName": user.first_name,
                "lastName": user.last_name,
                "createdAt": user.created_at,
            },
            "subscription": subscription_json(subscription.as_ref()),
            "quota": {
                "used": quota.used,
                "total": quota.total,
                "remaining": quota.remaining,
                "canCreate": quota.can_create,
            },
        }),
        Err(e) => failure_json(&e, "profile"),
    }
}

async fn load_profile(
    client: &SaasTfClient,
) -> ApiResult<(User, Option<Subscription>, QuotaInfo)> {
    let user = client.get_current_user().await?;
    let subscription = client.get_current_subscription().await?;
    let quota = client.get_quota().await?;
    Ok((user, subscription, quota))
}

pub async fn user_subdomains(client: &SaasTfClient) -> Value {
    match client.list_subdomains().await {
        Ok(list) => {
            let total = list.subdomains.len();
            let active = list.subdomains.iter().filter(|s| s.is_active).count();
            json!({
                "subdomains": list.subdomains,
                "quota": list.quota,
                "summary": {
                    "totalSubdomains": total,
                    "activeSubdomains": active,
                    "inactiveSubdomains": total - active,
                },
            })
        }
        Err(e) => failure_json(&e, "subdomains"),
    }
}

fn subscription_json(subscription: Option<&Subscription>) -> Value {
    match subscription {
        Some(s) => json!({
            "id": s.id,
            "plan": s.plan,
            "status": s.status,
            "quota": s.quota,
            "currentPeriodStart": s.current_period_start,
            "currentPeriodEnd": s.current_period_end,
        }),
        None => json!({ "plan": "FREE", "status": "ACTIVE", "quota": 2 }),
    }
}

fn failure_json(error: &ApiError, what: &str) -> Value {
    if error.is_unauthorized() {
        return json!({
            "error": "Not authenticated",
            "message": format!("Please login to view your {what}"),
        });
    }
    log::warn!("Failed to load {what}: {error}");
    let message = if error.message.is_empty() {
        "An error occurred"
    } else {
        error.message.as_str()
    };
    json!({
        "error": format!("Failed to load {what}"),
        "message": message,
    })
}
