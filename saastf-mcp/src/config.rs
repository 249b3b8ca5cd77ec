//! Server configuration from environment variables.

use saastf_api::ClientConfig;
use saastf_core::StoreConfig;

/// Overrides the API origin.
pub const ENV_API_URL: &str = "SAASTF_API_URL";
/// Overrides the encrypted fallback file location.
pub const ENV_CREDENTIALS_FILE: &str = "SAASTF_CREDENTIALS_FILE";
/// Any value other than empty, `0` or `false` skips the OS keyring entirely.
pub const ENV_DISABLE_KEYRING: &str = "SAASTF_DISABLE_KEYRING";

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub client: ClientConfig,
    pub store: StoreConfig,
    pub disable_keyring: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.client = config.client.with_base_url(url.trim());
        }
        if let Some(path) = lookup(ENV_CREDENTIALS_FILE).filter(|v| !v.trim().is_empty()) {
            config.store = config.store.with_fallback_path(path.trim());
        }
        config.disable_keyring = lookup(ENV_DISABLE_KEYRING).is_some_and(|v| is_truthy(&v));

        config
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert_eq!(config.client.base_url, saastf_api::DEFAULT_BASE_URL);
        assert!(!config.disable_keyring);
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = config_from(&[
            (ENV_API_URL, "http://localhost:3000/api/v1"),
            (ENV_CREDENTIALS_FILE, "/tmp/saastf/creds.enc"),
            (ENV_DISABLE_KEYRING, "1"),
        ]);

        assert_eq!(config.client.base_url, "http://localhost:3000/api/v1");
        assert_eq!(config.store.fallback_path, Path::new("/tmp/saastf/creds.enc"));
        assert!(config.disable_keyring);
    }

    #[test]
    fn falsy_values_keep_keyring_enabled() {
        for value in ["", "0", "false", "OFF"] {
            assert!(!config_from(&[(ENV_DISABLE_KEYRING, value)]).disable_keyring);
        }
    }
}
