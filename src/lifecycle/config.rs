//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! 1. Environment variables (highest priority)
//!    STOREFRONT_API_URL, STOREFRONT_API_TOKEN,
//!    STOREFRONT_API_TIMEOUT_SECS, STOREFRONT_NOTICE_TTL_SECS
//! 2. TOML config file
//! 3. Default values (lowest priority)
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://shop.example.com/api"
//! timeout_secs = 15
//! auth_token = "..."
//!
//! [api.headers]
//! x-client = "storefront"
//!
//! [notices]
//! ttl_secs = 4
//! ```

use crate::framework::{HttpTransport, TransportError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";

pub const ENV_API_URL: &str = "STOREFRONT_API_URL";
pub const ENV_API_TOKEN: &str = "STOREFRONT_API_TOKEN";
pub const ENV_API_TIMEOUT: &str = "STOREFRONT_API_TIMEOUT_SECS";
pub const ENV_NOTICE_TTL: &str = "STOREFRONT_NOTICE_TTL_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to build HTTP client: {0}")]
    Transport(#[from] TransportError),
}

// =============================================================================
// API Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Default: 30
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sent as `Authorization: Bearer <token>` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Extra default headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            auth_token: None,
            headers: BTreeMap::new(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the production transport from these settings.
    pub fn build_transport(&self) -> Result<HttpTransport, TransportError> {
        let mut builder = HttpTransport::builder(&self.base_url).timeout(self.timeout());
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        builder.build()
    }
}

// =============================================================================
// Notice Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// How long a notice stays visible. Default: 5
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    5
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl NoticeConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

// =============================================================================
// Storefront Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub notices: NoticeConfig,
}

impl StorefrontConfig {
    /// Defaults, then the TOML file (if given and present), then environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must start with http:// or https://, got: {}",
                url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.notices.ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "notices.ttl_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key/value source (the process environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api.auth_token = Some(token);
        }

        if let Some(timeout) = lookup(ENV_API_TIMEOUT) {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid {}", ENV_API_TIMEOUT),
            }
        }

        if let Some(ttl) = lookup(ENV_NOTICE_TTL) {
            match ttl.parse::<u64>() {
                Ok(secs) => self.notices.ttl_secs = secs,
                Err(_) => warn!(value = %ttl, "Ignoring invalid {}", ENV_NOTICE_TTL),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.notices.ttl(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StorefrontConfig::from_toml_str(
            r#"
            [api]
            base_url = "https://shop.example.com/api"

            [api.headers]
            x-client = "storefront"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.headers.get("x-client").map(String::as_str), Some("storefront"));
        assert_eq!(config.notices.ttl_secs, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[notices]\nttl_secs = 2").unwrap();

        let config = StorefrontConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.notices.ttl_secs, 2);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.notices.ttl_secs, 5);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config =
            StorefrontConfig::from_toml_str("[api]\nbase_url = \"https://file.example.com\"").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "https://env.example.com"),
            (ENV_API_TOKEN, "secret"),
            (ENV_API_TIMEOUT, "not-a-number"),
            (ENV_NOTICE_TTL, "9"),
        ]);

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://env.example.com");
        assert_eq!(config.api.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.notices.ttl_secs, 9);
    }

    #[test]
    fn test_validation() {
        let mut config = StorefrontConfig::default();
        config.api.base_url = "ftp://nope".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = StorefrontConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_notice_ttl_is_rejected() {
        let config = StorefrontConfig::from_toml_str("[notices]\nttl_secs = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("ttl_secs")));

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| (key == ENV_NOTICE_TTL).then(|| "0".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml() {
        let result = StorefrontConfig::from_toml_str("[api\nbase_url = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
