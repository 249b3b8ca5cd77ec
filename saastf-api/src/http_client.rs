//! HTTP execution helpers
//!
//! Sends a prepared `RequestBuilder`, logs the exchange and folds transport
//! failures and non-2xx bodies into [`ApiError`].

use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiErrorCode, ApiResult, UpgradeInfo};
use crate::utils::log_sanitizer::{redact_tokens, truncate_for_log};

/// `{ "error": { ... } }` envelope used by every failing endpoint.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    upgrade_info: Option<UpgradeInfo>,
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns status code and response text.
    ///
    /// Transport failures are classified as `TIMEOUT` or `NETWORK_ERROR`;
    /// any status code is returned as-is for the caller to interpret.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
    ) -> ApiResult<(u16, String)> {
        log::debug!("{method_name} {path}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                log::warn!("{method_name} {path} timed out: {e}");
                ApiError::timeout()
            } else {
                log::warn!("{method_name} {path} failed: {e}");
                ApiError::network()
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("Response Status: {status_code}");

        let response_text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::timeout()
            } else {
                log::warn!("Failed to read response body: {e}");
                ApiError::network().with_status(status_code)
            }
        })?;

        log::debug!(
            "Response Body: {}",
            truncate_for_log(&redact_tokens(&response_text))
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON success body.
    pub fn parse_json<T>(response_text: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("JSON parse failed: {e}");
            log::error!(
                "Raw response: {}",
                truncate_for_log(&redact_tokens(response_text))
            );
            ApiError::unknown(format!("Unexpected response from server: {e}"))
        })
    }

    /// Build an [`ApiError`] from a non-2xx response.
    ///
    /// A JSON object body supplies code and message; anything else becomes
    /// `UNKNOWN_ERROR`. The HTTP status is always retained.
    pub fn error_from_response(status_code: u16, response_text: &str) -> ApiError {
        let fallback_message = format!("Request failed with status code {status_code}");

        let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(response_text) else {
            return ApiError::unknown(fallback_message).with_status(status_code);
        };

        let body = envelope.error.unwrap_or(ErrorBody {
            code: None,
            message: None,
            timestamp: None,
            upgrade_info: None,
        });

        ApiError {
            code: body
                .code
                .filter(|c| !c.is_empty())
                .map_or(ApiErrorCode::UnknownError, ApiErrorCode::from),
            message: body
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback_message),
            timestamp: body.timestamp,
            upgrade_info: body.upgrade_info,
            status: Some(status_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_error_body_is_used() {
        let body = r#"{"error":{"code":"SUBDOMAIN_TAKEN","message":"Name in use","timestamp":"2025-01-01T00:00:00Z"}}"#;
        let error = HttpUtils::error_from_response(409, body);
        assert_eq!(error.code, ApiErrorCode::SubdomainTaken);
        assert_eq!(error.message, "Name in use");
        assert_eq!(error.timestamp.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(error.status, Some(409));
    }

    #[test]
    fn object_without_error_field_is_unknown() {
        let error = HttpUtils::error_from_response(500, r#"{"ok":false}"#);
        assert_eq!(error.code, ApiErrorCode::UnknownError);
        assert_eq!(error.message, "Request failed with status code 500");
    }

    #[test]
    fn non_json_body_is_unknown_with_status() {
        let error = HttpUtils::error_from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(error.code, ApiErrorCode::UnknownError);
        assert_eq!(error.status, Some(502));
    }

    #[test]
    fn missing_code_falls_back_to_unknown() {
        let error = HttpUtils::error_from_response(400, r#"{"error":{"message":"bad"}}"#);
        assert_eq!(error.code, ApiErrorCode::UnknownError);
        assert_eq!(error.message, "bad");
    }

    #[test]
    fn parse_json_invalid() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Foo {
            x: i32,
        }
        let result: ApiResult<Foo> = HttpUtils::parse_json("not json");
        assert!(
            matches!(&result, Err(e) if e.code == ApiErrorCode::UnknownError),
            "unexpected parse result: {result:?}"
        );
    }
}
