//! Keyring-based secret backend
//!
//! Uses the system keychain (Keychain on macOS, Credential Manager on Windows,
//! secret-service on Linux) to hold the saas.tf credential.

use async_trait::async_trait;
use saastf_core::error::{CoreError, CoreResult};
use saastf_core::traits::SecretBackend;

/// OS secret store slot addressed by a fixed service/account pair.
///
/// The keyring API is blocking, so every call runs on the blocking pool.
pub struct KeyringBackend {
    service: String,
    account: String,
}

impl KeyringBackend {
    #[must_use]
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(service: &str, account: &str) -> CoreResult<keyring::Entry> {
        keyring::Entry::new(service, account).map_err(|e| CoreError::BackendError(e.to_string()))
    }

    /// Run a keyring operation on the blocking pool.
    async fn with_entry<T, F>(&self, op: F) -> CoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&keyring::Entry) -> CoreResult<T> + Send + 'static,
    {
        let service = self.service.clone();
        let account = self.account.clone();
        tokio::task::spawn_blocking(move || op(&Self::entry(&service, &account)?))
            .await
            .map_err(|e| CoreError::BackendError(format!("Task join error: {e}")))?
    }
}

#[async_trait]
impl SecretBackend for KeyringBackend {
    fn name(&self) -> &'static str {
        "keyring"
    }

    async fn load(&self) -> CoreResult<Option<String>> {
        self.with_entry(|entry| match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CoreError::BackendError(e.to_string())),
        })
        .await
    }

    async fn store(&self, secret: &str) -> CoreResult<()> {
        let secret = secret.to_string();
        self.with_entry(move |entry| {
            entry
                .set_password(&secret)
                .map_err(|e| CoreError::BackendError(e.to_string()))
        })
        .await
    }

    async fn clear(&self) -> CoreResult<()> {
        self.with_entry(|entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CoreError::BackendError(e.to_string())),
        })
        .await
    }
}
