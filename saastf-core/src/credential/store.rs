//! Fallback-aware credential store

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::traits::SecretBackend;

/// Single-secret store over the OS secret facility with an encrypted-file fallback.
///
/// The OS backend is probed once on construction. The first time it fails,
/// whether in the probe or during an operation, the store switches to the
/// fallback for the rest of its lifetime and retries the failed operation
/// there. The switch is never undone.
///
/// Every backend call is bounded by the configured operation timeout; an OS
/// backend that hangs is treated like one that errors.
pub struct SecureCredentialStore {
    os: Option<Arc<dyn SecretBackend>>,
    fallback: Arc<dyn SecretBackend>,
    os_usable: AtomicBool,
    op_timeout: Duration,
}

impl SecureCredentialStore {
    /// Build the store and probe the OS backend with a read.
    ///
    /// Pass `None` for `os` to run on the fallback only.
    pub async fn new(
        os: Option<Arc<dyn SecretBackend>>,
        fallback: Arc<dyn SecretBackend>,
        op_timeout: Duration,
    ) -> Self {
        let store = Self {
            os_usable: AtomicBool::new(os.is_some()),
            os,
            fallback,
            op_timeout,
        };
        store.probe().await;
        store
    }

    async fn probe(&self) {
        let Some(os) = self.active_os() else {
            log::info!(
                "Using {} backend for credential storage",
                self.fallback.name()
            );
            return;
        };

        match self.bounded(os.name(), "probe", os.load()).await {
            Ok(_) => log::info!("Using {} backend for credential storage", os.name()),
            Err(e) => self.downgrade(&e),
        }
    }

    /// Whether the store has switched (or was configured) to the fallback backend.
    pub fn is_using_fallback(&self) -> bool {
        self.active_os().is_none()
    }

    /// Name of the backend that serves reads and writes right now.
    pub fn active_backend(&self) -> &'static str {
        self.active_os().map_or(self.fallback.name(), |os| os.name())
    }

    fn active_os(&self) -> Option<&Arc<dyn SecretBackend>> {
        if self.os_usable.load(Ordering::SeqCst) {
            self.os.as_ref()
        } else {
            None
        }
    }

    /// Set-once switch to the fallback; concurrent callers log it only once.
    fn downgrade(&self, error: &CoreError) {
        if self.os_usable.swap(false, Ordering::SeqCst) {
            log::warn!(
                "OS secret store unavailable ({error}), using {} backend for the rest of this session",
                self.fallback.name()
            );
        }
    }

    async fn bounded<T>(
        &self,
        backend: &str,
        operation: &str,
        fut: impl Future<Output = CoreResult<T>>,
    ) -> CoreResult<T> {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| CoreError::Timeout {
                operation: format!("{backend} {operation}"),
                secs: self.op_timeout.as_secs(),
            })?
    }

    /// Map a fallback failure, taking into account whether the OS backend already failed.
    fn fallback_failed(os_error: Option<CoreError>, error: CoreError) -> CoreError {
        match (os_error, error) {
            (_, e @ CoreError::DecryptionFailed(_)) | (None, e) => e,
            (Some(os_error), e) => CoreError::StoreUnavailable(format!("{os_error}; {e}")),
        }
    }

    /// Current secret, or `None` when nothing is stored.
    pub async fn load(&self) -> CoreResult<Option<String>> {
        let mut os_error = None;
        if let Some(os) = self.active_os() {
            match self.bounded(os.name(), "load", os.load()).await {
                Ok(secret) => return Ok(secret),
                Err(e) => {
                    self.downgrade(&e);
                    os_error = Some(e);
                }
            }
        }

        self.bounded(self.fallback.name(), "load", self.fallback.load())
            .await
            .map_err(|e| Self::fallback_failed(os_error, e))
    }

    /// Persist `secret`, replacing any previous value.
    pub async fn store(&self, secret: &str) -> CoreResult<()> {
        let mut os_error = None;
        if let Some(os) = self.active_os() {
            match self.bounded(os.name(), "store", os.store(secret)).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    self.downgrade(&e);
                    os_error = Some(e);
                }
            }
        }

        self.bounded(self.fallback.name(), "store", self.fallback.store(secret))
            .await
            .map_err(|e| Self::fallback_failed(os_error, e))
    }

    /// Remove the secret from both backends, whichever is active.
    ///
    /// Individual backend failures are logged and otherwise ignored. A failed
    /// clear on the active OS backend still switches the store to the fallback,
    /// so a secret left behind there is never read again.
    pub async fn clear(&self) {
        if let Some(os) = &self.os {
            if let Err(e) = self.bounded(os.name(), "clear", os.clear()).await {
                if self.active_os().is_some() {
                    self.downgrade(&e);
                } else {
                    log::debug!("Ignoring {} clear failure: {e}", os.name());
                }
            }
        }

        if let Err(e) = self
            .bounded(self.fallback.name(), "clear", self.fallback.clear())
            .await
        {
            log::warn!("Failed to remove credential from {}: {e}", self.fallback.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailOn, MemoryBackend};

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn store_with(
        os: &Arc<MemoryBackend>,
        fallback: &Arc<MemoryBackend>,
    ) -> SecureCredentialStore {
        SecureCredentialStore::new(
            Some(Arc::clone(os) as Arc<dyn SecretBackend>),
            Arc::clone(fallback) as Arc<dyn SecretBackend>,
            TIMEOUT,
        )
        .await
    }

    #[tokio::test]
    async fn healthy_os_backend_is_used() {
        let os = Arc::new(MemoryBackend::named("os"));
        let fallback = Arc::new(MemoryBackend::named("file"));
        let store = store_with(&os, &fallback).await;

        store.store("secret").await.unwrap();

        assert!(!store.is_using_fallback());
        assert_eq!(store.active_backend(), "os");
        assert_eq!(os.secret().await.as_deref(), Some("secret"));
        assert_eq!(fallback.secret().await, None);
        assert_eq!(store.load().await.unwrap().as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn failed_probe_selects_fallback() {
        let os = Arc::new(MemoryBackend::named("os").failing(FailOn::Load));
        let fallback = Arc::new(MemoryBackend::named("file"));
        let store = store_with(&os, &fallback).await;

        assert!(store.is_using_fallback());
        store.store("secret").await.unwrap();

        assert_eq!(os.calls().stores, 0);
        assert_eq!(fallback.secret().await.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn store_failure_downgrades_permanently() {
        let os = Arc::new(MemoryBackend::named("os").failing(FailOn::Store));
        let fallback = Arc::new(MemoryBackend::named("file"));
        let store = store_with(&os, &fallback).await;
        assert!(!store.is_using_fallback());

        store.store("secret").await.unwrap();
        assert!(store.is_using_fallback());
        assert_eq!(fallback.secret().await.as_deref(), Some("secret"));

        let os_loads = os.calls().loads;
        assert_eq!(store.load().await.unwrap().as_deref(), Some("secret"));
        store.store("second").await.unwrap();

        assert_eq!(os.calls().loads, os_loads);
        assert_eq!(os.calls().stores, 1);
        assert_eq!(fallback.secret().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn load_failure_retries_on_fallback() {
        let os = Arc::new(MemoryBackend::named("os"));
        let fallback = Arc::new(MemoryBackend::named("file"));
        fallback.set_secret("from-file").await;
        let store = store_with(&os, &fallback).await;

        os.set_failure(FailOn::Load).await;
        assert_eq!(store.load().await.unwrap().as_deref(), Some("from-file"));
        assert!(store.is_using_fallback());
    }

    #[tokio::test]
    async fn hanging_os_backend_times_out_and_downgrades() {
        let os = Arc::new(MemoryBackend::named("os"));
        let fallback = Arc::new(MemoryBackend::named("file"));
        let store = SecureCredentialStore::new(
            Some(Arc::clone(&os) as Arc<dyn SecretBackend>),
            Arc::clone(&fallback) as Arc<dyn SecretBackend>,
            Duration::from_millis(50),
        )
        .await;

        os.set_delay(Duration::from_secs(5)).await;
        store.store("secret").await.unwrap();

        assert!(store.is_using_fallback());
        assert_eq!(fallback.secret().await.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn both_backends_failing_is_store_unavailable() {
        let os = Arc::new(MemoryBackend::named("os"));
        let fallback = Arc::new(MemoryBackend::named("file").failing(FailOn::Store));
        let store = store_with(&os, &fallback).await;

        os.set_failure(FailOn::Store).await;
        let result = store.store("secret").await;

        assert!(matches!(result, Err(CoreError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn fallback_only_errors_propagate_unchanged() {
        let fallback = Arc::new(MemoryBackend::named("file").failing(FailOn::Load));
        let store = SecureCredentialStore::new(
            None,
            Arc::clone(&fallback) as Arc<dyn SecretBackend>,
            TIMEOUT,
        )
        .await;

        assert!(matches!(store.load().await, Err(CoreError::StorageError(_))));
    }

    #[tokio::test]
    async fn clear_reaches_both_backends_and_swallows_errors() {
        let os = Arc::new(MemoryBackend::named("os"));
        let fallback = Arc::new(MemoryBackend::named("file"));
        os.set_secret("orphan-os").await;
        fallback.set_secret("orphan-file").await;
        let store = store_with(&os, &fallback).await;

        store.clear().await;
        assert_eq!(os.secret().await, None);
        assert_eq!(fallback.secret().await, None);

        os.set_failure(FailOn::Clear).await;
        fallback.set_failure(FailOn::Clear).await;
        store.clear().await;
        store.clear().await;
    }

    #[tokio::test]
    async fn failed_os_clear_downgrades_so_secret_stays_gone() {
        let os = Arc::new(MemoryBackend::named("os"));
        let fallback = Arc::new(MemoryBackend::named("file"));
        os.set_secret("stuck").await;
        let store = store_with(&os, &fallback).await;

        os.set_failure(FailOn::Clear).await;
        store.clear().await;

        assert!(store.is_using_fallback());
        assert_eq!(store.load().await.unwrap(), None);
        assert_eq!(os.secret().await.as_deref(), Some("stuck"));
    }

    #[tokio::test]
    async fn clear_on_empty_store_leaves_it_absent() {
        let os = Arc::new(MemoryBackend::named("os"));
        let fallback = Arc::new(MemoryBackend::named("file"));
        let store = store_with(&os, &fallback).await;

        store.clear().await;
        store.clear().await;

        assert_eq!(store.load().await.unwrap(), None);
    }
}
