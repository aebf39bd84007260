//! Service configuration
//!
//! Loaded once at startup from a JSON file. Anything missing, malformed or
//! out of range is fatal: the service never runs on a configuration it only
//! partially understood.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::protocol::constants::{DEFAULT_NICK, DEFAULT_UPSTREAM_ADDR};
use crate::registry::DEFAULT_CAPACITY;

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_upstream_addr() -> String {
    DEFAULT_UPSTREAM_ADDR.to_string()
}

fn default_nick() -> String {
    DEFAULT_NICK.to_string()
}

fn default_keepalive_secs() -> u64 {
    15
}

fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Service settings as they appear in the JSON config file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Channels to join at startup, in any casing
    pub channels: Vec<String>,

    /// Port the query API listens on
    pub http_port: u16,

    /// Interface the query API binds to
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// Upstream chat endpoint as `host:port`
    #[serde(default = "default_upstream_addr")]
    pub upstream_addr: String,

    /// Nick used for the anonymous login
    #[serde(default = "default_nick")]
    pub nick: String,

    /// Seconds between keepalive probes
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,

    /// Messages retained per channel
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let settings: Settings = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Address the query API binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Keepalive probe interval
    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.keepalive_secs == 0 {
            return Err(ConfigError::Invalid(
                "keepalive_secs must be at least 1".to_string(),
            ));
        }
        if self.channels.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "channel names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, r#"{"channels": ["XQC"], "http_port": 8080}"#);

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.channels, vec!["XQC".to_string()]);
        assert_eq!(settings.http_port, 8080);
        assert_eq!(settings.http_host, "0.0.0.0");
        assert_eq!(settings.upstream_addr, DEFAULT_UPSTREAM_ADDR);
        assert_eq!(settings.nick, DEFAULT_NICK);
        assert_eq!(settings.keepalive_secs, 15);
        assert_eq!(settings.history_capacity, DEFAULT_CAPACITY);
        assert_eq!(settings.listen_addr(), "0.0.0.0:8080");
        assert_eq!(settings.keepalive_interval(), Duration::from_secs(15));
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "channels": ["a", "b"],
                "http_port": 9000,
                "http_host": "127.0.0.1",
                "upstream_addr": "localhost:16667",
                "nick": "justinfan999",
                "keepalive_secs": 5,
                "history_capacity": 32
            }"#,
        );

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.listen_addr(), "127.0.0.1:9000");
        assert_eq!(settings.upstream_addr, "localhost:16667");
        assert_eq!(settings.nick, "justinfan999");
        assert_eq!(settings.keepalive_interval(), Duration::from_secs(5));
        assert_eq!(settings.history_capacity, 32);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.json");

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }), "got: {}", err);
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, r#"{"channels": ["a"], "http_port": }"#);

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {}", err);
    }

    #[test]
    fn test_load_missing_required_field_fails() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, r#"{"channels": ["a"]}"#);

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {}", err);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{"channels": ["a"], "http_port": 8080, "history_capacity": 0}"#,
        );

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got: {}", err);
    }

    #[test]
    fn test_zero_keepalive_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{"channels": ["a"], "http_port": 8080, "keepalive_secs": 0}"#,
        );

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got: {}", err);
    }

    #[test]
    fn test_blank_channel_name_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, r#"{"channels": ["a", "  "], "http_port": 8080}"#);

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got: {}", err);
    }

    #[test]
    fn test_empty_channel_list_is_allowed() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, r#"{"channels": [], "http_port": 8080}"#);

        let settings = Settings::load(&path).unwrap();
        assert!(settings.channels.is_empty());
    }
}
