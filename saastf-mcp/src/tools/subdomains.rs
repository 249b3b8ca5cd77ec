//! Subdomain tools.

use saastf_api::SaasTfClient;

use super::{ToolError, ToolResult, remaining_of_total};
use crate::format::{format_suggestions, generate_suggestions};
use crate::schemas::{
    CheckAvailabilityParams, CreateSubdomainParams, DeleteSubdomainParams, UpdateSubdomainParams,
};
use crate::validators;

const SUGGESTION_COUNT: usize = 5;

pub async fn check_availability(
    client: &SaasTfClient,
    params: &CheckAvailabilityParams,
) -> ToolResult {
    let name = params.name.as_str();
    validators::subdomain_name(name)?;

    let result = client
        .check_availability(name)
        .await
        .map_err(|e| ToolError::api_for(e, name))?;

    if result.available {
        return Ok(format!("✓ \"{name}.saas.tf\" is available!"));
    }

    let suggestions = result
        .suggestions
        .unwrap_or_else(|| generate_suggestions(name, SUGGESTION_COUNT));
    Ok(format!(
        "\"{name}.saas.tf\" is already taken.\n\n{}",
        format_suggestions(&suggestions)
    ))
}

pub async fn list(client: &SaasTfClient) -> ToolResult {
    let list = client.list_subdomains().await?;
    let quota = &list.quota;

    if list.subdomains.is_empty() {
        return Ok(format!(
            "You have no subdomains yet.\n\nYou can create {} FREE subdomains. \
             Use saastf_create_subdomain to get started!",
            quota.total
        ));
    }

    let lines: Vec<String> = list
        .subdomains
        .iter()
        .map(|s| {
            let inactive = if s.is_active { "" } else { " (inactive)" };
            format!("  • {} → {}{inactive}", s.full_domain, s.ip_address)
        })
        .collect();

    Ok(format!(
        "Your subdomains ({}/{} used):\n\n{}\n\nRemaining: {} subdomains",
        quota.used,
        quota.total,
        lines.join("\n"),
        quota.remaining
    ))
}

pub async fn create(client: &SaasTfClient, params: &CreateSubdomainParams) -> ToolResult {
    validators::subdomain_name(&params.name)?;
    validators::ip_address(&params.ip_address)?;

    let subdomain = client
        .create_subdomain(&params.name, &params.ip_address)
        .await
        .map_err(|e| ToolError::api_for(e, &params.name))?;
    let quota = client.get_quota().await?;

    Ok(format!(
        "✓ Successfully created {} → {}\n\nDNS will be active in ~60 seconds. \
         You have {} subdomains remaining.",
        subdomain.full_domain,
        subdomain.ip_address,
        remaining_of_total(&quota)
    ))
}

pub async fn update(client: &SaasTfClient, params: &UpdateSubdomainParams) -> ToolResult {
    validators::ip_address(&params.ip_address)?;
    validators::required(&params.id, "Subdomain ID")?;

    let subdomain = client
        .update_subdomain(&params.id, &params.ip_address)
        .await?;

    Ok(format!(
        "✓ Updated {} → {}\n\nDNS changes will propagate in ~60 seconds.",
        subdomain.full_domain, subdomain.ip_address
    ))
}

pub async fn delete(client: &SaasTfClient, params: &DeleteSubdomainParams) -> ToolResult {
    validators::required(&params.id, "Subdomain ID")?;

    // looked up first so the confirmation can name what was removed
    let list = client.list_subdomains().await?;
    let full_domain = list
        .subdomains
        .into_iter()
        .find(|s| s.id == params.id)
        .map_or_else(|| "subdomain".to_string(), |s| s.full_domain);

    client.delete_subdomain(&params.id).await?;
    let quota = client.get_quota().await?;

    Ok(format!(
        "✓ Deleted {full_domain}\n\nDNS records removed. You now have {} subdomains available.",
        remaining_of_total(&quota)
    ))
}
