//! Quota, plans and checkout tools.

use std::fmt::Write as _;

use chrono::DateTime;
use saastf_api::{QuotaInfo, SaasTfClient, SubscriptionPlan};

use super::{ToolError, ToolResult};
use crate::schemas::CreateCheckoutParams;
use crate::validators;

pub async fn get_quota(client: &SaasTfClient) -> ToolResult {
    let quota = client.get_quota().await?;
    Ok(describe_quota(&quota))
}

fn describe_quota(quota: &QuotaInfo) -> String {
    let mut message = format!(
        "Current Plan: {}\n\nSubdomains: {}/{} used\nRemaining: {} available\n",
        quota.plan, quota.used, quota.total, quota.remaining
    );

    if quota.remaining == 0 {
        message.push_str(
            "\n⚠️ You've reached your limit. Use saastf_get_plans to see upgrade options, \
             or delete an existing subdomain.",
        );
    } else if quota.remaining <= 2 && quota.total > 2 {
        message.push_str("\n💡 Running low on subdomains. Use saastf_get_plans to see upgrade options.");
    }
    message
}

pub async fn get_plans(client: &SaasTfClient) -> ToolResult {
    let plans = client.get_plans().await?;

    let mut message = String::from("Available Subscription Plans:\n\n");
    for plan in &plans {
        let _ = writeln!(message, "📦 {}", plan.name);
        let _ = writeln!(message, "   Price: {}", plan.price);
        let _ = writeln!(message, "   Quota: {} subdomains", plan.quota);
        if !plan.features.is_empty() {
            message.push_str("   Features:\n");
            for feature in &plan.features {
                let _ = writeln!(message, "     • {feature}");
            }
        }
        message.push('\n');
    }
    message.push_str("Use saastf_create_checkout to upgrade your plan.");

    Ok(message)
}

pub async fn create_checkout(client: &SaasTfClient, params: &CreateCheckoutParams) -> ToolResult {
    let plan = validators::subscription_plan(&params.plan).map_err(|e| {
        let valid: Vec<&str> = SubscriptionPlan::ALL.iter().map(|p| p.as_str()).collect();
        ToolError::Message(format!("{e}\n\nValid plans: {}", valid.join(", ")))
    })?;

    let session = client.create_checkout(plan).await?;
    log::info!("Checkout session {} created for {plan}", session.session_id);

    Ok(format!(
        "✓ Checkout session created for {}!\n\nComplete your purchase here:\n{}\n\n\
         After payment, your quota will be automatically updated.",
        plan.display_name(),
        session.checkout_url
    ))
}

pub async fn get_subscription(client: &SaasTfClient) -> ToolResult {
    let Some(subscription) = client.get_current_subscription().await? else {
        return Ok(
            "You are on the FREE plan (2 subdomains).\n\nUse saastf_get_plans to see upgrade options."
                .to_string(),
        );
    };

    let mut message = format!(
        "Current Subscription:\n\nPlan: {}\nStatus: {}\nQuota: {} subdomains\n",
        subscription.plan, subscription.status, subscription.quota
    );
    if let Some(end) = subscription.current_period_end.as_deref() {
        let _ = writeln!(message, "Renews: {}", renewal_date(end));
    }
    Ok(message)
}

fn renewal_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map_or_else(|_| raw.to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}
