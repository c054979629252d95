//! Dashboard configuration
//!
//! Optional YAML file plus a single environment override (`API_BASE_URL`)
//! for the backend address. A missing config file is not an error; the
//! defaults describe a local development backend.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variable that overrides the backend base URL
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

fn default_api_base_url() -> String {
    market_client::DEFAULT_API_BASE_URL.to_string()
}

fn default_watchlist() -> Vec<String> {
    [
        "SPY", "QQQ", "TSLA", "AAPL", "NVDA", "META", "AMZN", "AMD", "MSFT", "GOOGL", "NFLX",
        "COIN",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_ticker() -> String {
    "TSLA".to_string()
}

fn default_reconnect_delay_secs() -> u64 {
    30
}

fn default_toast_duration_ms() -> u64 {
    4000
}

/// Main dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,

    #[serde(default = "default_ticker")]
    pub default_ticker: String,

    /// Fixed delay between alert-feed reconnection attempts
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,

    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            watchlist: default_watchlist(),
            default_ticker: default_ticker(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file, then apply env overrides.
    /// A missing file falls back to defaults; the override still applies.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let mut config = if config_path.as_ref().exists() {
            let yaml_content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&yaml_content)?
        } else {
            Self::default()
        };

        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.api_base_url = base_url.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api_base_url must not be empty".to_string(),
            ));
        }

        if self.default_ticker.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_ticker must not be empty".to_string(),
            ));
        }

        if self.watchlist.is_empty() {
            return Err(ConfigError::ValidationError(
                "watchlist must contain at least one symbol".to_string(),
            ));
        }

        if self.reconnect_delay_secs == 0 {
            return Err(ConfigError::ValidationError(
                "reconnect_delay_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_ticker, "TSLA");
        assert_eq!(config.watchlist.len(), 12);
        assert_eq!(config.reconnect_delay_secs, 30);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        std::env::remove_var(API_BASE_URL_ENV);
        let config = DashboardConfig::load("/nonexistent/dashboard.yaml").unwrap();
        assert_eq!(config.api_base_url, market_client::DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_base_url: http://10.0.0.5:8000\nwatchlist:\n  - SPY\n  - IWM\ndefault_ticker: SPY"
        )
        .unwrap();

        std::env::remove_var(API_BASE_URL_ENV);
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:8000");
        assert_eq!(config.watchlist, vec!["SPY", "IWM"]);
        assert_eq!(config.default_ticker, "SPY");
        // Unspecified fields keep their defaults
        assert_eq!(config.toast_duration_ms, 4000);
    }

    #[test]
    fn test_validate_rejects_zero_reconnect_delay() {
        let config = DashboardConfig {
            reconnect_delay_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_watchlist() {
        let config = DashboardConfig {
            watchlist: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
