//! Account tools: status, register, login, logout.

use saastf_api::{ApiErrorCode, ApiResult, QuotaInfo, SaasTfClient, User};

use super::{ToolError, ToolResult, remaining_of_total};
use crate::schemas::{LoginParams, RegisterParams};
use crate::validators;

const NOT_AUTHENTICATED: &str = "Not authenticated\n\nPlease login or register to use saas.tf";

/// Who is signed in. Never reaches the network without a usable credential.
pub async fn status(client: &SaasTfClient) -> ToolResult {
    if !client.credentials().is_authenticated().await {
        return Ok(NOT_AUTHENTICATED.to_string());
    }

    match profile(client).await {
        Ok((user, quota)) => {
            let mut message = format!("Authenticated as {}", user.email);
            if let Some(name) = user.first_name.as_deref().filter(|n| !n.is_empty()) {
                message.push_str(&format!(" ({name})"));
            }
            message.push_str(&format!(
                "\n\nPlan: {}\nSubdomains: {}/{} used ({} remaining)",
                quota.plan, quota.used, quota.total, quota.remaining
            ));
            Ok(message)
        }
        Err(e) if e.is_unauthorized() || e.code == ApiErrorCode::NetworkError => {
            Ok(NOT_AUTHENTICATED.to_string())
        }
        Err(e) => Err(e.into()),
    }
}

async fn profile(client: &SaasTfClient) -> ApiResult<(User, QuotaInfo)> {
    let user = client.get_current_user().await?;
    let quota = client.get_quota().await?;
    Ok((user, quota))
}

pub async fn register(client: &SaasTfClient, params: &RegisterParams) -> ToolResult {
    validators::email(&params.email)?;
    validators::password(&params.password)?;

    let user = client
        .register(
            &params.email,
            &params.password,
            params.first_name.as_deref(),
            params.last_name.as_deref(),
        )
        .await?;

    Ok(format!(
        "✓ Account created successfully! Welcome to saas.tf, {}!\n\n\
         You now have 2 FREE subdomains available. Use saastf_create_subdomain to get started.",
        user.display_name()
    ))
}

pub async fn login(client: &SaasTfClient, params: &LoginParams) -> ToolResult {
    validators::email(&params.email)?;
    if params.password.is_empty() {
        return Err(ToolError::Message("Password is required".to_string()));
    }

    let user = match client.login(&params.email, &params.password).await {
        Ok(user) => user,
        Err(e) if e.is_unauthorized() => {
            return Err(ToolError::Message(
                "Invalid email or password. Please check your credentials and try again."
                    .to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    let quota = client.get_quota().await?;

    Ok(format!(
        "✓ Successfully logged in as {}\n\nYou have {} subdomains available.",
        user.email,
        remaining_of_total(&quota)
    ))
}

/// Always succeeds: the local credential is gone either way.
pub async fn logout(client: &SaasTfClient) -> ToolResult {
    match client.logout().await {
        Ok(()) => Ok("✓ Successfully logged out. Your credentials have been cleared.".to_string()),
        Err(e) => {
            log::warn!("Remote logout failed, credential cleared locally: {e}");
            Ok("✓ Logged out locally. Your credentials have been cleared.".to_string())
        }
    }
}
