//! Agent-facing text for API failures.

use saastf_api::{ApiError, ApiErrorCode, UpgradeInfo};

use super::suggestions::{format_suggestions, generate_suggestions};

const SUGGESTION_COUNT: usize = 5;

const AUTH_REQUIRED: &str =
    "Authentication required. Please login with your saas.tf credentials.";

const SUBDOMAIN_RULES: &str = "Subdomain rules:
  • 3-63 characters
  • Lowercase letters, numbers, and hyphens only
  • Must start and end with a letter or number
  • No consecutive hyphens

Examples: myapp, demo-project, staging-api";

/// Render `error` for the agent. `subdomain` is the name the call was about,
/// used to offer alternatives when it is taken.
pub fn format_error(error: &ApiError, subdomain: Option<&str>) -> String {
    // a 401 asks for login whatever code (if any) the body carried
    if error.is_unauthorized() {
        return AUTH_REQUIRED.to_string();
    }

    match &error.code {
        ApiErrorCode::QuotaExceeded => quota_exceeded(error.upgrade_info.as_ref()),
        ApiErrorCode::SubdomainTaken => subdomain_taken(subdomain),
        ApiErrorCode::InvalidSubdomainName => {
            format!("Invalid subdomain name: {}\n\n{SUBDOMAIN_RULES}", error.message)
        }
        ApiErrorCode::InvalidIpAddress => format!(
            "Invalid IP address: {}\n\nExpected format: xxx.xxx.xxx.xxx (e.g., 192.168.1.1)",
            error.message
        ),
        ApiErrorCode::ReservedSubdomain => format!(
            "This subdomain name is reserved and cannot be used.\n\n{}",
            error.message
        ),
        ApiErrorCode::Unauthorized => AUTH_REQUIRED.to_string(),
        ApiErrorCode::Forbidden => format!("Access denied: {}", error.message),
        ApiErrorCode::NotFound => format!("Resource not found: {}", error.message),
        ApiErrorCode::ValidationError => format!("Validation error: {}", error.message),
        ApiErrorCode::Conflict => format!("Conflict: {}", error.message),
        ApiErrorCode::DnsCreateFailed
        | ApiErrorCode::DnsUpdateFailed
        | ApiErrorCode::DnsDeleteFailed => format!(
            "DNS operation failed: {}\n\nPlease try again. If the problem persists, contact support.",
            error.message
        ),
        ApiErrorCode::NetworkError => {
            "Network error. Please check your internet connection and try again.".to_string()
        }
        ApiErrorCode::Timeout => "Request timed out. Please try again.".to_string(),
        ApiErrorCode::RateLimitExceeded => {
            "Rate limit exceeded. Please wait a moment and try again.".to_string()
        }
        ApiErrorCode::CredentialStoreFailed => {
            log::error!("Credential persistence failed: {}", error.message);
            "Signed in, but the credential could not be saved locally - check server logs for details"
                .to_string()
        }
        ApiErrorCode::UnknownError | ApiErrorCode::Unrecognized(_) => {
            if error.message.is_empty() {
                "An unexpected error occurred. Please try again.".to_string()
            } else {
                error.message.clone()
            }
        }
    }
}

fn quota_exceeded(upgrade: Option<&UpgradeInfo>) -> String {
    let mut message = String::from("You've reached your subdomain limit.");

    let Some(upgrade) = upgrade else {
        message.push_str(
            "\n\nOptions:\n  • Delete an existing subdomain to free up space\n  • Upgrade your plan for more subdomains (use saastf_get_plans to see options)",
        );
        return message;
    };

    message.push_str(&format!(
        "\n\nCurrent plan: {} ({} subdomains)",
        upgrade.current_plan, upgrade.current_quota
    ));

    if !upgrade.suggested_plans.is_empty() {
        message.push_str("\n\nUpgrade options:");
        for plan in &upgrade.suggested_plans {
            message.push_str(&format!(
                "\n  • {}: {} subdomains for {}",
                plan.name, plan.quota, plan.price
            ));
        }
        message.push_str(
            "\n\nUse saastf_create_checkout to upgrade, or delete an existing subdomain to free up space.",
        );
    }
    message
}

fn subdomain_taken(subdomain: Option<&str>) -> String {
    let mut message = String::from("This subdomain is already taken.");
    if let Some(name) = subdomain {
        let suggestions = generate_suggestions(name, SUGGESTION_COUNT);
        message.push_str("\n\n");
        message.push_str(&format_suggestions(&suggestions));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use saastf_api::SuggestedPlan;

    fn error(code: ApiErrorCode, message: &str) -> ApiError {
        ApiError::new(code, message)
    }

    #[test]
    fn quota_exceeded_lists_upgrade_options() {
        let mut err = error(ApiErrorCode::QuotaExceeded, "limit");
        err.upgrade_info = Some(UpgradeInfo {
            current_plan: "FREE".into(),
            current_quota: 2,
            suggested_plans: vec![SuggestedPlan {
                name: "PACKAGE_5".into(),
                quota: 7,
                price: "$10/year".into(),
            }],
        });

        let text = format_error(&err, None);
        assert!(text.starts_with("You've reached your subdomain limit."));
        assert!(text.contains("Current plan: FREE (2 subdomains)"));
        assert!(text.contains("  • PACKAGE_5: 7 subdomains for $10/year"));
        assert!(text.ends_with("delete an existing subdomain to free up space."));
    }

    #[test]
    fn quota_exceeded_without_upgrade_info_offers_generic_options() {
        let text = format_error(&error(ApiErrorCode::QuotaExceeded, "limit"), None);
        assert!(text.contains("Options:"));
        assert!(text.contains("saastf_get_plans"));
    }

    #[test]
    fn taken_name_gets_suggestions() {
        let text = format_error(&error(ApiErrorCode::SubdomainTaken, "taken"), Some("myapp"));
        assert!(text.starts_with("This subdomain is already taken.\n\nTry: myapp-dev"));
        assert!(text.ends_with(", or myapp-demo"));

        let bare = format_error(&error(ApiErrorCode::SubdomainTaken, "taken"), None);
        assert_eq!(bare, "This subdomain is already taken.");
    }

    #[test]
    fn fixed_messages_ignore_server_text() {
        assert_eq!(
            format_error(&error(ApiErrorCode::Unauthorized, "jwt expired"), None),
            "Authentication required. Please login with your saas.tf credentials."
        );
        assert_eq!(
            format_error(&ApiError::timeout(), None),
            "Request timed out. Please try again."
        );
        assert!(format_error(&ApiError::network(), None).contains("internet connection"));
    }

    #[test]
    fn any_401_asks_for_login() {
        let bare = ApiError::unknown("Request failed with status code 401").with_status(401);
        let odd_code = ApiError::new(ApiErrorCode::Unrecognized("TOKEN_REVOKED".into()), "revoked")
            .with_status(401);

        for err in [bare, odd_code] {
            assert_eq!(format_error(&err, None), AUTH_REQUIRED);
        }
    }

    #[test]
    fn prefixed_messages_carry_server_text() {
        assert_eq!(
            format_error(&error(ApiErrorCode::NotFound, "Subdomain not found"), None),
            "Resource not found: Subdomain not found"
        );
        assert!(
            format_error(&error(ApiErrorCode::DnsUpdateFailed, "upstream"), None)
                .starts_with("DNS operation failed: upstream")
        );
        assert!(
            format_error(&error(ApiErrorCode::InvalidSubdomainName, "bad"), None)
                .contains("No consecutive hyphens")
        );
    }

    #[test]
    fn unknown_codes_fall_back_to_message() {
        let unknown = error(ApiErrorCode::Unrecognized("PAYMENT_REQUIRED".into()), "Pay up");
        assert_eq!(format_error(&unknown, None), "Pay up");
        assert_eq!(
            format_error(&ApiError::unknown(""), None),
            "An unexpected error occurred. Please try again."
        );
    }

    #[test]
    fn credential_store_failure_is_sanitized() {
        let err = error(
            ApiErrorCode::CredentialStoreFailed,
            "Failed to save credentials locally: /home/dev/.saastf-mcp denied",
        );
        let text = format_error(&err, None);
        assert!(!text.contains("/home/dev"));
        assert!(text.contains("check server logs"));
    }
}
