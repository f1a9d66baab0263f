//! Configuration management for the waitlist service
//!
//! Configuration comes from defaults, then either a TOML file or environment
//! variables. The Upstash and admin variables keep the names the hosted
//! deployment already injects (`UPSTASH_REDIS_REST_URL`,
//! `UPSTASH_REDIS_REST_TOKEN`, `ADMIN_KEY`); everything else uses the
//! `WAITLIST_<SECTION>_<KEY>` pattern.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

mod error;

pub use error::ConfigError;

use crate::core_store::UpstashConfig;
use crate::logging::LogLevel;

/// Values given on the command line. They win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<SocketAddr>,
    pub log_level: Option<String>,
    pub json_logs: bool,
    pub memory_store: bool,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Store configuration
    pub store: StoreConfig,

    /// Admin access configuration
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,
}

/// Which store implementation backs the waitlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Upstash Redis over REST
    Upstash,
    /// In-process memory, lost on restart
    Memory,
}

impl StoreBackend {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "upstash" => Some(StoreBackend::Upstash),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend selection
    pub backend: StoreBackend,

    /// Upstash REST URL
    pub upstash_url: Option<String>,

    /// Upstash REST token
    pub upstash_token: Option<SecretString>,

    /// Timeout for a single store request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

/// Admin access configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret for the membership listing. Unset means nobody may list.
    pub admin_key: Option<SecretString>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Upstash,
            upstash_url: None,
            upstash_token: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_target: true,
        }
    }
}

impl StoreConfig {
    /// Upstash connection settings, if both URL and token are present
    pub fn upstash(&self) -> Option<UpstashConfig> {
        match (&self.upstash_url, &self.upstash_token) {
            (Some(url), Some(token)) => Some(UpstashConfig {
                url: url.clone(),
                token: token.clone(),
                timeout: self.request_timeout,
            }),
            _ => None,
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from an arbitrary key lookup.
    ///
    /// Values are parsed but the result is not validated, so callers can
    /// apply overrides first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Server config
        if let Some(addr) = lookup("WAITLIST_SERVER_BIND_ADDRESS") {
            config.server.bind_address = addr
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid bind address: {}", e)))?;
        }

        // Store config
        if let Some(backend) = lookup("WAITLIST_STORE_BACKEND") {
            config.store.backend = StoreBackend::parse(&backend).ok_or_else(|| {
                ConfigError::InvalidValue(format!("Invalid store backend: {}", backend))
            })?;
        }
        if let Some(url) = lookup("UPSTASH_REDIS_REST_URL") {
            config.store.upstash_url = Some(url);
        }
        if let Some(token) = lookup("UPSTASH_REDIS_REST_TOKEN") {
            config.store.upstash_token = Some(SecretString::new(token));
        }
        if let Some(timeout) = lookup("WAITLIST_STORE_REQUEST_TIMEOUT") {
            config.store.request_timeout = humantime::parse_duration(&timeout).map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid request timeout: {}", e))
            })?;
        }

        // Auth config
        if let Some(key) = lookup("ADMIN_KEY") {
            config.auth.admin_key = Some(SecretString::new(key));
        }

        // Logging config
        if let Some(level) = lookup("WAITLIST_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = lookup("WAITLIST_LOG_JSON") {
            config.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON flag: {}", e)))?;
        }

        Ok(config)
    }

    /// Load and validate configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file without validating it
    pub fn read_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text without validating it
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Apply command-line overrides on top of file or environment values
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if overrides.json_logs {
            self.logging.json_format = true;
        }
        if overrides.memory_store {
            self.store.backend = StoreBackend::Memory;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate store config
        if self.store.backend == StoreBackend::Upstash && self.store.upstash().is_none() {
            return Err(ConfigError::ValidationFailed(
                "upstash backend requires UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN"
                    .to_string(),
            ));
        }

        if self.store.request_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        // Validate logging config
        if LogLevel::parse(&self.logging.level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Configured admin secret. An empty value counts as unset.
    pub fn admin_key(&self) -> Option<SecretString> {
        self.auth
            .admin_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn memory_config() -> Config {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Memory;
        config
    }

    #[test]
    fn test_default_config_requires_upstash_credentials() {
        let config = Config::default();
        assert!(config.validate().is_err());
        assert!(memory_config().validate().is_ok());
    }

    #[test]
    fn test_from_lookup_reads_deployment_variables() {
        let config = Config::from_lookup(lookup_from(&[
            ("UPSTASH_REDIS_REST_URL", "https://db.upstash.io"),
            ("UPSTASH_REDIS_REST_TOKEN", "tok"),
            ("ADMIN_KEY", "hunter2"),
            ("WAITLIST_SERVER_BIND_ADDRESS", "0.0.0.0:3000"),
            ("WAITLIST_STORE_REQUEST_TIMEOUT", "2s"),
            ("WAITLIST_LOG_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(config.server.bind_address.port(), 3000);
        assert_eq!(config.store.backend, StoreBackend::Upstash);
        assert_eq!(config.store.request_timeout, Duration::from_secs(2));
        assert!(config.logging.json_format);

        let upstash = config.store.upstash().unwrap();
        assert_eq!(upstash.url, "https://db.upstash.io");
        assert_eq!(upstash.token.expose_secret(), "tok");
        assert_eq!(config.admin_key().unwrap().expose_secret(), "hunter2");
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(Config::from_lookup(lookup_from(&[
            ("WAITLIST_STORE_BACKEND", "memory"),
            ("WAITLIST_SERVER_BIND_ADDRESS", "nowhere"),
        ]))
        .is_err());

        assert!(Config::from_lookup(lookup_from(&[("WAITLIST_STORE_BACKEND", "postgres")])).is_err());

        assert!(Config::from_lookup(lookup_from(&[
            ("WAITLIST_STORE_BACKEND", "memory"),
            ("WAITLIST_STORE_REQUEST_TIMEOUT", "soon"),
        ]))
        .is_err());
    }

    #[test]
    fn test_empty_admin_key_counts_as_unset() {
        let config = Config::from_lookup(lookup_from(&[
            ("WAITLIST_STORE_BACKEND", "memory"),
            ("ADMIN_KEY", ""),
        ]))
        .unwrap();

        assert!(config.admin_key().is_none());
    }

    #[test]
    fn test_log_level_validation() {
        let mut config = memory_config();

        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_level_aliases_pass_validation() {
        let mut config = memory_config();
        config.logging.level = "WARNING".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_memory_override_rescues_file_without_credentials() {
        let mut config = Config::from_toml_str("[store]\nbackend = \"upstash\"\n").unwrap();
        assert!(config.validate().is_err());

        config.apply(&ConfigOverrides {
            memory_store: true,
            ..ConfigOverrides::default()
        });
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let mut config = Config::from_lookup(lookup_from(&[
            ("WAITLIST_STORE_BACKEND", "memory"),
            ("WAITLIST_LOG_LEVEL", "shouty"),
            ("WAITLIST_SERVER_BIND_ADDRESS", "127.0.0.1:3000"),
        ]))
        .unwrap();
        assert!(config.validate().is_err());

        config.apply(&ConfigOverrides {
            bind_address: Some("0.0.0.0:4000".parse().unwrap()),
            log_level: Some("debug".to_string()),
            json_logs: true,
            memory_store: false,
        });

        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address.port(), 4000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_from_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[store]\nbackend = \"upstash\"\n").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::ValidationFailed(_))
        ));
        assert!(Config::read_file(file.path()).is_ok());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = memory_config();
        config.store.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
bind_address = "127.0.0.1:9000"

[store]
backend = "memory"
request_timeout = "500ms"

[auth]
admin_key = "from-file"

[logging]
level = "warn"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.bind_address.port(), 9000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.request_timeout, Duration::from_millis(500));
        assert_eq!(config.admin_key().unwrap().expose_secret(), "from-file");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError(_)));
    }
}
