//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{
    default_nick, default_reply_queue_size, default_reply_rate, default_source, default_version,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Client identity.
    #[serde(default)]
    pub client: ClientConfig,
    /// CTCP reply behaviour.
    #[serde(default)]
    pub ctcp: CtcpConfig,
    /// Prometheus endpoint.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Client identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Our own nickname. Requests from it are never answered.
    #[serde(default = "default_nick")]
    pub nick: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            nick: default_nick(),
        }
    }
}

/// CTCP reply configuration.
///
/// Immutable once a scheduler has been built from it.
#[derive(Debug, Clone, Deserialize)]
pub struct CtcpConfig {
    /// Maximum pending replies per connection.
    #[serde(default = "default_reply_queue_size")]
    pub reply_queue_size: usize,
    /// Minimum interval between replies on one connection, in seconds.
    #[serde(default = "default_reply_rate")]
    pub reply_rate: f64,
    /// Payload of the VERSION reply.
    #[serde(default = "default_version")]
    pub version: String,
    /// Payload of the SOURCE reply.
    #[serde(default = "default_source")]
    pub source: String,
}

impl CtcpConfig {
    /// `reply_rate` as a [`Duration`].
    ///
    /// Falls back to the default rate if the configured value cannot be
    /// represented (negative, NaN or overflowing).
    pub fn reply_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.reply_rate)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_reply_rate()))
    }
}

impl Default for CtcpConfig {
    fn default() -> Self {
        Self {
            reply_queue_size: default_reply_queue_size(),
            reply_rate: default_reply_rate(),
            version: default_version(),
            source: default_source(),
        }
    }
}

/// Prometheus metrics endpoint configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Port for the `/metrics` HTTP endpoint. Disabled when absent.
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.client.nick, "slctcp");
        assert_eq!(config.ctcp.reply_queue_size, 10);
        assert_eq!(config.ctcp.reply_interval(), Duration::from_millis(250));
        assert!(config.ctcp.version.starts_with("slctcp "));
        assert!(config.metrics.port.is_none());
    }

    #[test]
    fn ctcp_section_overrides() {
        let config: Config = toml::from_str(
            r#"
[ctcp]
reply_queue_size = 2
reply_rate = 1.5
version = "TestClient 9.9"
"#,
        )
        .unwrap();
        assert_eq!(config.ctcp.reply_queue_size, 2);
        assert_eq!(config.ctcp.reply_interval(), Duration::from_millis(1500));
        assert_eq!(config.ctcp.version, "TestClient 9.9");
        assert_eq!(config.ctcp.source, default_source());
    }

    #[test]
    fn unrepresentable_rate_falls_back() {
        let config = CtcpConfig {
            reply_rate: -1.0,
            ..CtcpConfig::default()
        };
        assert_eq!(config.reply_interval(), Duration::from_millis(250));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\nnick = \"bot\"\n\n[metrics]\nport = 9191").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.client.nick, "bot");
        assert_eq!(config.metrics.port, Some(9191));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/slctcp.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_bad_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ctcp\nreply_rate = ").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
