//! MCP Server implementation for saas.tf.
//!
//! Exposes account, subdomain and billing tools plus three read-only
//! resources. Every tool call goes through the authenticated client, which
//! owns credential attachment and purging.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
        PaginatedRequestParams, ProtocolVersion, RawResource, ReadResourceRequestParams,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

use saastf_api::SaasTfClient;

use crate::resources::{self, DOCUMENTATION, DOCUMENTATION_URI, PROFILE_URI, SUBDOMAINS_URI};
use crate::schemas::{
    CheckAvailabilityParams, CreateCheckoutParams, CreateSubdomainParams, DeleteSubdomainParams,
    EmptyParams, LoginParams, RegisterParams, UpdateSubdomainParams,
};
use crate::tools::{self, ToolResult};

/// Sanitize error messages to prevent sensitive information leakage.
///
/// Logs the full error to stderr but returns a generic message to the client.
fn sanitize_internal_error(error: impl std::fmt::Display, context: &str) -> McpError {
    log::error!("{context} error: {error}");
    McpError::internal_error(
        format!("{context} failed - check server logs for details"),
        None,
    )
}

/// Turn a tool outcome into a text result; failures become `isError` results.
fn into_call_result(tool: &str, result: ToolResult) -> CallToolResult {
    tools::log_failure(tool, &result);
    match result {
        Ok(message) => CallToolResult::success(vec![Content::text(message)]),
        Err(e) => CallToolResult::error(vec![Content::text(format!("Error: {}", e.render()))]),
    }
}

/// MCP Server for saas.tf.
///
/// Provides AI agents with subdomain management through the Model Context
/// Protocol.
#[derive(Clone)]
pub struct SaasTfMcp {
    /// Authenticated API client shared by every tool.
    client: Arc<SaasTfClient>,
    /// Tool router generated by macro.
    tool_router: ToolRouter<Self>,
}

impl SaasTfMcp {
    #[must_use]
    pub fn new(client: Arc<SaasTfClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl SaasTfMcp {
    #[tool(
        name = "saastf_auth_status",
        description = "Check authentication status with saas.tf. Returns user info and quota if authenticated, or indicates authentication needed."
    )]
    async fn auth_status(
        &self,
        _params: Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::auth::status(&self.client).await;
        Ok(into_call_result("saastf_auth_status", result))
    }

    #[tool(
        name = "saastf_register",
        description = "Register a new saas.tf account. Get 2 FREE subdomains immediately! Only email and password required. Optional: firstName, lastName."
    )]
    async fn register(
        &self,
        Parameters(params): Parameters<RegisterParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::auth::register(&self.client, &params).await;
        Ok(into_call_result("saastf_register", result))
    }

    #[tool(
        name = "saastf_login",
        description = "Login to your saas.tf account with email and password."
    )]
    async fn login(
        &self,
        Parameters(params): Parameters<LoginParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::auth::login(&self.client, &params).await;
        Ok(into_call_result("saastf_login", result))
    }

    #[tool(
        name = "saastf_logout",
        description = "Logout from saas.tf and clear stored credentials."
    )]
    async fn logout(&self, _params: Parameters<EmptyParams>) -> Result<CallToolResult, McpError> {
        let result = tools::auth::logout(&self.client).await;
        Ok(into_call_result("saastf_logout", result))
    }

    #[tool(
        name = "saastf_check_availability",
        description = "Check if a subdomain name is available on saas.tf (e.g., myapp.saas.tf). Returns availability status and helpful suggestions if taken."
    )]
    async fn check_availability(
        &self,
        Parameters(params): Parameters<CheckAvailabilityParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::subdomains::check_availability(&self.client, &params).await;
        Ok(into_call_result("saastf_check_availability", result))
    }

    #[tool(
        name = "saastf_list_subdomains",
        description = "List all your subdomains on saas.tf with usage quota and statistics."
    )]
    async fn list_subdomains(
        &self,
        _params: Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::subdomains::list(&self.client).await;
        Ok(into_call_result("saastf_list_subdomains", result))
    }

    #[tool(
        name = "saastf_create_subdomain",
        description = "Create a new subdomain on saas.tf. Automatically provisions DNS A record pointing to your IP. DNS goes live in ~60 seconds."
    )]
    async fn create_subdomain(
        &self,
        Parameters(params): Parameters<CreateSubdomainParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::subdomains::create(&self.client, &params).await;
        Ok(into_call_result("saastf_create_subdomain", result))
    }

    #[tool(
        name = "saastf_update_subdomain",
        description = "Update the IP address for an existing subdomain. DNS changes propagate automatically in ~60 seconds."
    )]
    async fn update_subdomain(
        &self,
        Parameters(params): Parameters<UpdateSubdomainParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::subdomains::update(&self.client, &params).await;
        Ok(into_call_result("saastf_update_subdomain", result))
    }

    #[tool(
        name = "saastf_delete_subdomain",
        description = "Delete a subdomain. DNS records are removed automatically. This frees up quota for new subdomains."
    )]
    async fn delete_subdomain(
        &self,
        Parameters(params): Parameters<DeleteSubdomainParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::subdomains::delete(&self.client, &params).await;
        Ok(into_call_result("saastf_delete_subdomain", result))
    }

    #[tool(
        name = "saastf_get_quota",
        description = "Get your current subdomain quota, usage, and plan details. Shows how many subdomains you have available."
    )]
    async fn get_quota(
        &self,
        _params: Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::subscription::get_quota(&self.client).await;
        Ok(into_call_result("saastf_get_quota", result))
    }

    #[tool(
        name = "saastf_get_plans",
        description = "Get available subscription plans and pricing. Upgrade to get more subdomains! Plans: FREE (2), PACKAGE_5 ($10/year for 7), PACKAGE_50 ($50/year for 52)."
    )]
    async fn get_plans(
        &self,
        _params: Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::subscription::get_plans(&self.client).await;
        Ok(into_call_result("saastf_get_plans", result))
    }

    #[tool(
        name = "saastf_get_subscription",
        description = "Get details of your current paid subscription (plan, status, quota, renewal date). Reports the FREE plan when there is none."
    )]
    async fn get_subscription(
        &self,
        _params: Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::subscription::get_subscription(&self.client).await;
        Ok(into_call_result("saastf_get_subscription", result))
    }

    #[tool(
        name = "saastf_create_checkout",
        description = "Create a Stripe checkout session to upgrade your plan. Returns a checkout URL to complete payment. After payment, quota updates automatically."
    )]
    async fn create_checkout(
        &self,
        Parameters(params): Parameters<CreateCheckoutParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::subscription::create_checkout(&self.client, &params).await;
        Ok(into_call_result("saastf_create_checkout", result))
    }
}

#[tool_handler]
impl ServerHandler for SaasTfMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "saas.tf MCP Server - Claim and manage free subdomains of saas.tf pointing at your IPv4 addresses. \
                 Start with saastf_auth_status; use saastf_register or saastf_login when not authenticated. \
                 Use saastf_check_availability before saastf_create_subdomain, and saastf_get_quota / \
                 saastf_get_plans to manage capacity. Read saastf://documentation for naming rules and plans."
                    .into(),
            ),
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let listed = resources::RESOURCES
            .iter()
            .map(|spec| {
                RawResource {
                    description: Some(spec.description.to_string()),
                    mime_type: Some(spec.mime_type.to_string()),
                    ..RawResource::new(spec.uri, spec.name)
                }
                .no_annotation()
            })
            .collect();
        std::future::ready(Ok(ListResourcesResult::with_all_items(listed)))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = request.uri.as_str();
            let text = match uri {
                DOCUMENTATION_URI => DOCUMENTATION.to_string(),
                PROFILE_URI | SUBDOMAINS_URI => {
                    let document = if uri == PROFILE_URI {
                        resources::user_profile(&self.client).await
                    } else {
                        resources::user_subdomains(&self.client).await
                    };
                    serde_json::to_string_pretty(&document)
                        .map_err(|e| sanitize_internal_error(e, "Serialize resource"))?
                }
                _ => {
                    return Err(McpError::resource_not_found(
                        format!("Unknown resource: {uri}"),
                        None,
                    ));
                }
            };

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(text, uri)],
            })
        }
    }
}

#[cfg(test)]
#[path = "test_mocks.rs"]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
pub(crate) mod test_mocks;

#[cfg(test)]
#[path = "server_tests.rs"]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests;

#[cfg(test)]
#[path = "client_integration_tests.rs"]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod client_integration_tests;
