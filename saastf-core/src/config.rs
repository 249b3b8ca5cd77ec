//! Credential storage configuration

use std::path::PathBuf;
use std::time::Duration;

/// Service name under which the secret is filed in the OS secret store.
pub const DEFAULT_SERVICE_NAME: &str = "saastf-mcp";
/// Account name of the single secret slot.
pub const DEFAULT_ACCOUNT_NAME: &str = "jwt-token";
/// Seconds subtracted from a credential's expiry before it is considered unusable.
pub const EXPIRY_GRACE_SECS: i64 = 60;

const FALLBACK_DIR_NAME: &str = ".saastf-mcp";
const FALLBACK_FILE_NAME: &str = "credentials.enc";
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub service_name: String,
    pub account_name: String,
    /// Location of the encrypted fallback file.
    pub fallback_path: PathBuf,
    /// Upper bound for every single backend operation.
    pub op_timeout: Duration,
    /// How long an in-memory credential copy is trusted before the store is consulted again.
    pub cache_ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            account_name: DEFAULT_ACCOUNT_NAME.to_string(),
            fallback_path: default_fallback_path(),
            op_timeout: DEFAULT_OP_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn with_fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = path.into();
        self
    }

    #[must_use]
    pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// `~/.saastf-mcp/credentials.enc`, or relative to the working directory when no home exists.
pub fn default_fallback_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(FALLBACK_DIR_NAME)
        .join(FALLBACK_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_locations() {
        let config = StoreConfig::default();
        assert_eq!(config.service_name, "saastf-mcp");
        assert_eq!(config.account_name, "jwt-token");
        assert!(config.fallback_path.ends_with(".saastf-mcp/credentials.enc"));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.op_timeout, Duration::from_secs(10));
    }
}
