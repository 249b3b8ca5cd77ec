//! Unified error type definition

use saastf_api::{ApiError, ApiErrorCode};
use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Both the OS secret store and the encrypted file failed for one operation
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    /// The fallback file exists but cannot be decrypted with this machine's key
    #[error("Failed to decrypt stored credential: {0}")]
    DecryptionFailed(String),

    /// Filesystem error in the fallback backend
    #[error("Storage error: {0}")]
    StorageError(String),

    /// OS secret store error
    #[error("Secret backend error: {0}")]
    BackendError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A backend operation did not finish in time
    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },
}

impl CoreError {
    /// Whether it is expected behavior (e.g. a credential file left behind by another machine),
    /// used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::DecryptionFailed(_) => true,
            Self::StoreUnavailable(_)
            | Self::StorageError(_)
            | Self::BackendError(_)
            | Self::SerializationError(_)
            | Self::Timeout { .. } => false,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        Self::new(
            ApiErrorCode::CredentialStoreFailed,
            format!("Failed to save credentials locally: {error}"),
        )
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_surface_as_credential_store_failed() {
        let api: ApiError = CoreError::StoreUnavailable("keyring locked".into()).into();
        assert_eq!(api.code, ApiErrorCode::CredentialStoreFailed);
        assert!(api.message.contains("keyring locked"));
    }

    #[test]
    fn serializes_with_code_tag() {
        let json = serde_json::to_value(CoreError::Timeout {
            operation: "keyring load".into(),
            secs: 10,
        })
        .unwrap();
        assert_eq!(json["code"], "Timeout");
        assert_eq!(json["details"]["secs"], 10);
    }
}
