//! Test helper module
//!
//! In-memory secret backends with failure injection and a manually driven clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex as StdMutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::traits::{Clock, SecretBackend};

/// Operation a [`MemoryBackend`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Load,
    Store,
    Clear,
    All,
}

impl FailOn {
    fn covers(self, operation: Self) -> bool {
        self == Self::All || self == operation
    }
}

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendCalls {
    pub loads: usize,
    pub stores: usize,
    pub clears: usize,
}

// ===== MemoryBackend =====

pub struct MemoryBackend {
    name: &'static str,
    secret: Mutex<Option<String>>,
    /// If Some, the matching operation returns a `StorageError`
    failure: Mutex<Option<FailOn>>,
    delay: Mutex<Option<Duration>>,
    loads: AtomicUsize,
    stores: AtomicUsize,
    clears: AtomicUsize,
}

impl MemoryBackend {
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            secret: Mutex::new(None),
            failure: Mutex::new(None),
            delay: Mutex::new(None),
            loads: AtomicUsize::new(0),
            stores: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing(mut self, on: FailOn) -> Self {
        *self.failure.get_mut() = Some(on);
        self
    }

    pub async fn set_failure(&self, on: FailOn) {
        *self.failure.lock().await = Some(on);
    }

    pub async fn heal(&self) {
        *self.failure.lock().await = None;
    }

    /// Make every operation sleep first.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    pub async fn set_secret(&self, secret: &str) {
        *self.secret.lock().await = Some(secret.to_string());
    }

    pub async fn secret(&self) -> Option<String> {
        self.secret.lock().await.clone()
    }

    pub fn calls(&self) -> BackendCalls {
        BackendCalls {
            loads: self.loads.load(Ordering::SeqCst),
            stores: self.stores.load(Ordering::SeqCst),
            clears: self.clears.load(Ordering::SeqCst),
        }
    }

    async fn enter(&self, operation: FailOn, label: &str) -> CoreResult<()> {
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match *self.failure.lock().await {
            Some(on) if on.covers(operation) => Err(CoreError::StorageError(format!(
                "{} {label} failed",
                self.name
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SecretBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load(&self) -> CoreResult<Option<String>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.enter(FailOn::Load, "load").await?;
        Ok(self.secret.lock().await.clone())
    }

    async fn store(&self, secret: &str) -> CoreResult<()> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        self.enter(FailOn::Store, "store").await?;
        *self.secret.lock().await = Some(secret.to_string());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.enter(FailOn::Clear, "clear").await?;
        *self.secret.lock().await = None;
        Ok(())
    }
}

// ===== ManualClock =====

/// Clock that only moves when told to.
pub struct ManualClock {
    now: StdMutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: StdMutex::new(now),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ===== Tokens =====

/// Unsigned JWT-shaped token carrying the given claims.
pub fn make_token(claims: &serde_json::Value) -> String {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

/// Token for `user-1` that expires `expires_in` after `now`.
pub fn token_expiring_in(now: DateTime<Utc>, expires_in: TimeDelta) -> String {
    make_token(&serde_json::json!({
        "userId": "user-1",
        "email": "dev@example.com",
        "iat": now.timestamp(),
        "exp": (now + expires_in).timestamp(),
    }))
}
