//! Seam between the request pipeline and whatever holds the credential.

use async_trait::async_trait;

use crate::error::ApiResult;

/// Credential state as seen by [`SaasTfClient`](crate::SaasTfClient).
///
/// The pipeline never persists or caches the bearer credential itself; it asks
/// for a usable one before every call and tells the source to forget it when
/// the remote side rejects it.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// A credential that is locally judged usable, or `None`.
    ///
    /// Storage failures are the source's concern; they surface here as `None`
    /// so the call goes out unauthenticated and the server decides.
    async fn valid_token(&self) -> Option<String>;

    /// Persist a freshly issued credential.
    async fn store_token(&self, token: &str) -> ApiResult<()>;

    /// Forget the credential. Once this returns it must not be handed out again.
    async fn clear_token(&self);

    /// Whether a usable credential is held right now.
    async fn is_authenticated(&self) -> bool {
        self.valid_token().await.is_some()
    }
}
