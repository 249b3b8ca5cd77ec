//! saas.tf credential core
//!
//! Keeps the single saas.tf credential of the local user:
//! - [`SecureCredentialStore`]: OS secret store with an encrypted-file fallback
//! - [`TokenManager`]: in-memory cache with local expiry validation
//!
//! The OS secret store is plugged in through [`SecretBackend`], so this crate
//! has no platform dependencies of its own. [`TokenManager`] implements
//! [`saastf_api::CredentialSource`] and is what the API client is built with.

pub mod config;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export common types
pub use config::StoreConfig;
pub use credential::{EncryptedFileBackend, SecureCredentialStore, TokenClaims, TokenManager};
pub use error::{CoreError, CoreResult};
pub use traits::{Clock, SecretBackend, SystemClock};
