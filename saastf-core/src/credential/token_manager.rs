//! Credential cache and local validator

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use saastf_api::{ApiResult, CredentialSource};
use tokio::sync::Mutex;

use super::claims::TokenClaims;
use super::store::SecureCredentialStore;
use crate::config::{EXPIRY_GRACE_SECS, StoreConfig};
use crate::error::CoreResult;
use crate::traits::{Clock, SystemClock};

const GRACE_WINDOW: TimeDelta = TimeDelta::seconds(EXPIRY_GRACE_SECS);

struct CacheEntry {
    token: String,
    /// End of the cache window, independent of the token's own expiry.
    expires_at: DateTime<Utc>,
}

/// In-memory cache in front of [`SecureCredentialStore`].
///
/// Hands out a credential only if its embedded expiry is more than the grace
/// window away. Never touches the network.
pub struct TokenManager {
    store: Arc<SecureCredentialStore>,
    clock: Arc<dyn Clock>,
    cache_ttl: TimeDelta,
    cache: Mutex<Option<CacheEntry>>,
}

impl TokenManager {
    pub fn new(store: Arc<SecureCredentialStore>, config: &StoreConfig) -> Self {
        Self::with_clock(store, config.cache_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<SecureCredentialStore>,
        cache_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            clock,
            cache_ttl: TimeDelta::from_std(cache_ttl).unwrap_or(TimeDelta::weeks(52)),
            cache: Mutex::new(None),
        }
    }

    /// A credential that is safe to attach, or `None`.
    ///
    /// A cached copy is re-checked against its own expiry before use. An
    /// expired or undecodable credential found in the store is cleared.
    pub async fn get_valid_token(&self) -> CoreResult<Option<String>> {
        let mut cache = self.cache.lock().await;
        let now = self.clock.now();

        if let Some(entry) = cache.take() {
            if now < entry.expires_at && Self::is_valid_at(&entry.token, now) {
                let token = entry.token.clone();
                *cache = Some(entry);
                return Ok(Some(token));
            }
            log::debug!("Cached credential is stale, consulting the store");
        }

        let Some(token) = self.store.load().await? else {
            return Ok(None);
        };

        if !Self::is_valid_at(&token, now) {
            log::info!("Stored credential is expired or unreadable, removing it");
            self.store.clear().await;
            return Ok(None);
        }

        *cache = Some(CacheEntry {
            token: token.clone(),
            expires_at: now + self.cache_ttl,
        });
        Ok(Some(token))
    }

    /// Persist `token` and cache it with a fresh window.
    pub async fn store_token(&self, token: &str) -> CoreResult<()> {
        let mut cache = self.cache.lock().await;
        self.store.store(token).await?;
        *cache = Some(CacheEntry {
            token: token.to_string(),
            expires_at: self.clock.now() + self.cache_ttl,
        });
        log::debug!("Credential stored in {} backend", self.store.active_backend());
        Ok(())
    }

    /// Forget the credential in the cache and in every backend.
    pub async fn clear_token(&self) {
        let mut cache = self.cache.lock().await;
        *cache = None;
        self.store.clear().await;
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(self.get_valid_token().await, Ok(Some(_)))
    }

    /// Claims of the current credential, if there is a usable one and it decodes.
    pub async fn token_claims(&self) -> Option<TokenClaims> {
        match self.get_valid_token().await {
            Ok(Some(token)) => TokenClaims::decode(&token),
            Ok(None) => None,
            Err(e) => {
                log::debug!("No claims available: {e}");
                None
            }
        }
    }

    fn is_valid_at(token: &str, now: DateTime<Utc>) -> bool {
        TokenClaims::decode(token).is_some_and(|claims| claims.is_valid_at(now, GRACE_WINDOW))
    }
}

#[async_trait]
impl CredentialSource for TokenManager {
    async fn valid_token(&self) -> Option<String> {
        match self.get_valid_token().await {
            Ok(token) => token,
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Ignoring stored credential: {e}");
                } else {
                    log::error!("Failed to read stored credential: {e}");
                }
                None
            }
        }
    }

    async fn store_token(&self, token: &str) -> ApiResult<()> {
        Ok(TokenManager::store_token(self, token).await?)
    }

    async fn clear_token(&self) {
        TokenManager::clear_token(self).await;
    }

    async fn is_authenticated(&self) -> bool {
        TokenManager::is_authenticated(self).await
    }
}
