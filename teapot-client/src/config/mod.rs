//! Client configuration
//!
//! Defaults, TOML files and `TEAPOT_<SECTION>_<KEY>` environment overrides.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

mod error;

pub use error::ConfigError;

use crate::logging::LogLevel;

/// Main client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub contacts: ContactsConfig,
    pub directory: DirectoryConfig,
    pub notifications: NotificationsConfig,
    pub logging: LoggingConfig,
}

/// Where the TeapotNet node's web interface lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the node, e.g. `http://127.0.0.1:8480`
    pub base_url: String,

    /// Local user name; the contacts endpoint is scoped to it
    pub user: Option<String>,

    /// Raw `Cookie` header sent with every request
    pub cookie: Option<String>,

    /// Connect timeout for the shared HTTP client
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

/// Contact presence polling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsConfig {
    /// Delay between poll cycles, also used as the per-request timeout
    #[serde(with = "humantime_serde")]
    pub period: Duration,
}

/// Directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

/// Desktop notifications and the mail sound
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Permission granted out-of-band for desktop notifications
    pub enabled: bool,

    /// Play the mail sound on new private messages
    pub sound: bool,

    /// Page title the unread counter decorates
    pub base_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub json_format: bool,
    pub with_timestamp: bool,
    pub with_target: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8480".to_string(),
            user: None,
            cookie: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(5),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sound: true,
            base_title: "TeapotNet".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", key, e)))
}

fn parse_duration(key: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime_serde::re::humantime::parse_duration(value)
        .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", key, e)))
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Variables follow the pattern `TEAPOT_<SECTION>_<KEY>`, for example
    /// `TEAPOT_CONTACTS_PERIOD=2s`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment variables on top of the current values
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("TEAPOT_SERVER_BASE_URL") {
            self.server.base_url = url;
        }
        if let Ok(user) = env::var("TEAPOT_SERVER_USER") {
            self.server.user = Some(user);
        }
        if let Ok(cookie) = env::var("TEAPOT_SERVER_COOKIE") {
            self.server.cookie = Some(cookie);
        }
        if let Ok(timeout) = env::var("TEAPOT_SERVER_CONNECT_TIMEOUT") {
            self.server.connect_timeout = parse_duration("connect timeout", &timeout)?;
        }

        if let Ok(period) = env::var("TEAPOT_CONTACTS_PERIOD") {
            self.contacts.period = parse_duration("contacts period", &period)?;
        }
        if let Ok(timeout) = env::var("TEAPOT_DIRECTORY_TIMEOUT") {
            self.directory.timeout = parse_duration("directory timeout", &timeout)?;
        }

        if let Ok(enabled) = env::var("TEAPOT_NOTIFICATIONS_ENABLED") {
            self.notifications.enabled = parse_bool("notifications flag", &enabled)?;
        }
        if let Ok(sound) = env::var("TEAPOT_NOTIFICATIONS_SOUND") {
            self.notifications.sound = parse_bool("sound flag", &sound)?;
        }

        if let Ok(level) = env::var("TEAPOT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = env::var("TEAPOT_LOG_JSON") {
            self.logging.json_format = parse_bool("JSON flag", &json)?;
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server.base_url.starts_with("http://")
            || self.server.base_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationFailed(format!(
                "base_url must be an http(s) URL: {}",
                self.server.base_url
            )));
        }

        if let Some(user) = &self.server.user {
            if user.is_empty() || user.contains('/') {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid user name: {:?}",
                    user
                )));
            }
        }

        if self.contacts.period.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "contacts period must be greater than 0".to_string(),
            ));
        }

        if self.directory.timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "directory timeout must be greater than 0".to_string(),
            ));
        }

        if LogLevel::parse(&self.logging.level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.directory.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();
        config.contacts.period = Duration::ZERO;
        assert!(config.validate().is_err());

        config = ClientConfig::default();
        config.server.base_url = "ftp://node".to_string();
        assert!(config.validate().is_err());

        config = ClientConfig::default();
        config.server.user = Some("a/b".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_validation() {
        let mut config = ClientConfig::default();

        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "debug".to_string();
        assert!(config.validate().is_ok());

        config.logging.level = "WARNING".to_string();
        assert!(config.validate().is_ok());
        assert!(crate::logging::LogConfig::try_from(&config.logging).is_ok());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teapot.toml");

        let mut config = ClientConfig::default();
        config.server.user = Some("alice".to_string());
        config.contacts.period = Duration::from_millis(1500);
        config.save_to_file(&path).unwrap();

        let loaded = ClientConfig::from_file(&path).unwrap();
        assert_eq!(loaded.server.user.as_deref(), Some("alice"));
        assert_eq!(loaded.contacts.period, Duration::from_millis(1500));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teapot.toml");
        std::fs::write(&path, "[contacts]\nperiod = \"2s\"\n").unwrap();

        let loaded = ClientConfig::from_file(&path).unwrap();
        assert_eq!(loaded.contacts.period, Duration::from_secs(2));
        assert_eq!(loaded.server.base_url, ServerConfig::default().base_url);
    }

    #[test]
    fn test_missing_file() {
        let result = ClientConfig::from_file("/nonexistent/teapot.toml");
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars = [
            ("TEAPOT_SERVER_BASE_URL", "http://10.0.0.2:8480"),
            ("TEAPOT_SERVER_USER", "alice"),
            ("TEAPOT_CONTACTS_PERIOD", "2s"),
            ("TEAPOT_DIRECTORY_TIMEOUT", "90s"),
            ("TEAPOT_NOTIFICATIONS_ENABLED", "true"),
            ("TEAPOT_LOG_LEVEL", "DEBUG"),
        ];
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let config = ClientConfig::from_env();

        let bad = {
            env::set_var("TEAPOT_CONTACTS_PERIOD", "soon");
            let mut config = ClientConfig::default();
            config.apply_env()
        };

        for (key, _) in vars {
            env::remove_var(key);
        }

        let config = config.unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.2:8480");
        assert_eq!(config.server.user.as_deref(), Some("alice"));
        assert_eq!(config.contacts.period, Duration::from_secs(2));
        assert_eq!(config.directory.timeout, Duration::from_secs(90));
        assert!(config.notifications.enabled);
        assert_eq!(config.logging.level, "DEBUG");

        assert!(matches!(bad, Err(ConfigError::InvalidValue(_))));
    }
}
