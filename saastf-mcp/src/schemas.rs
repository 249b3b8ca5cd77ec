//! MCP tool parameter schemas
//!
//! Input structures for the saas.tf tools. All structs derive `Debug`,
//! `Deserialize` and `JsonSchema` as required by rmcp. Field names are
//! camelCase on the wire.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for tools that take no arguments.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EmptyParams {}

/// Parameters for `saastf_register`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParams {
    #[schemars(description = "Email address for the account")]
    pub email: String,

    #[schemars(description = "Password (min 8 characters, must include letter and number)")]
    pub password: String,

    #[schemars(description = "First name (optional)")]
    pub first_name: Option<String>,

    #[schemars(description = "Last name (optional)")]
    pub last_name: Option<String>,
}

/// Parameters for `saastf_login`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoginParams {
    #[schemars(description = "Email address")]
    pub email: String,

    #[schemars(description = "Password")]
    pub password: String,
}

/// Parameters for `saastf_check_availability`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CheckAvailabilityParams {
    #[schemars(description = "Subdomain name to check (without .saas.tf suffix)")]
    pub name: String,
}

/// Parameters for `saastf_create_subdomain`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubdomainParams {
    #[schemars(
        description = "Subdomain name (3-63 chars, lowercase, alphanumeric + hyphens, must start/end with letter or number)"
    )]
    pub name: String,

    #[schemars(description = "IPv4 address to point the subdomain to (e.g., 192.168.1.1)")]
    pub ip_address: String,
}

/// Parameters for `saastf_update_subdomain`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubdomainParams {
    #[schemars(description = "Subdomain ID (from saastf_list_subdomains)")]
    pub id: String,

    #[schemars(description = "New IPv4 address")]
    pub ip_address: String,
}

/// Parameters for `saastf_delete_subdomain`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteSubdomainParams {
    #[schemars(description = "Subdomain ID to delete (from saastf_list_subdomains)")]
    pub id: String,
}

/// Parameters for `saastf_create_checkout`.
///
/// Kept as a plain string so an unknown plan gets a readable tool error
/// instead of a deserialization failure.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateCheckoutParams {
    #[schemars(
        description = "Plan to upgrade to: PACKAGE_5 (7 subdomains, $10/year) or PACKAGE_50 (52 subdomains, $50/year)"
    )]
    pub plan: String,
}
