//! Secret backend abstraction Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// A single-slot secret persistence mechanism.
///
/// Platform implementations:
/// - OS secret facility: `KeyringBackend` (keyring crate, in the server binary)
/// - Encrypted file: [`EncryptedFileBackend`](crate::credential::EncryptedFileBackend)
#[async_trait]
pub trait SecretBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Read the secret.
    ///
    /// # Returns
    /// * `Ok(Some(secret))` - a secret is stored
    /// * `Ok(None)` - nothing stored
    async fn load(&self) -> CoreResult<Option<String>>;

    /// Replace the stored secret. A failed write must leave the previous value intact.
    async fn store(&self, secret: &str) -> CoreResult<()>;

    /// Remove the secret. Clearing an empty slot succeeds.
    async fn clear(&self) -> CoreResult<()>;
}
