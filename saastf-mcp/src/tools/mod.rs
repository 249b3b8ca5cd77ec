//! Tool bodies, one module per area.
//!
//! Each tool returns the text shown to the agent on success, or a
//! [`ToolError`] whose rendering becomes the error result.

pub mod auth;
pub mod subdomains;
pub mod subscription;

use saastf_api::{ApiError, QuotaInfo};

use crate::format::format_error;
use crate::validators::ValidationError;

/// Why a tool call failed.
#[derive(Debug)]
pub enum ToolError {
    /// Rejected locally before any request was made.
    Invalid(ValidationError),
    /// The API call failed. `subdomain` is the name the call was about.
    Api {
        error: ApiError,
        subdomain: Option<String>,
    },
    /// A message that is already agent-ready.
    Message(String),
}

impl ToolError {
    pub fn api_for(error: ApiError, subdomain: &str) -> Self {
        Self::Api {
            error,
            subdomain: Some(subdomain.to_string()),
        }
    }

    /// Agent-facing text, without the `Error:` prefix.
    pub fn render(&self) -> String {
        match self {
            Self::Invalid(e) => e.to_string(),
            Self::Api { error, subdomain } => format_error(error, subdomain.as_deref()),
            Self::Message(message) => message.clone(),
        }
    }

    fn log(&self, tool: &str) {
        match self {
            Self::Api { error, .. } if !error.is_expected() => {
                log::error!("{tool} failed: {error}");
            }
            Self::Api { error, .. } => log::warn!("{tool} failed: {error}"),
            Self::Invalid(e) => log::debug!("{tool} rejected input: {e}"),
            Self::Message(message) => log::debug!("{tool} failed: {message}"),
        }
    }
}

impl From<ValidationError> for ToolError {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(error)
    }
}

impl From<ApiError> for ToolError {
    fn from(error: ApiError) -> Self {
        Self::Api {
            error,
            subdomain: None,
        }
    }
}

pub type ToolResult = Result<String, ToolError>;

/// Log a failed tool call at a level matching its cause.
pub fn log_failure(tool: &str, result: &ToolResult) {
    if let Err(e) = result {
        e.log(tool);
    }
}

fn remaining_of_total(quota: &QuotaInfo) -> String {
    format!("{} of {}", quota.remaining, quota.total)
}
