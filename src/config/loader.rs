//! Configuration loader with environment variable expansion

use super::{expand_env_vars, AgileTestConfig, Config, ConfigError};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Config, ConfigError> {
        let expanded = expand_env_vars(content);
        let config: Config = serde_yaml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from environment variables only
    ///
    /// Unset variables fall back to the same defaults as the config file.
    pub fn from_env() -> Result<Config, ConfigError> {
        let mut config = Config::default();
        let agiletest = &mut config.agiletest;
        let defaults = AgileTestConfig::default();

        agiletest.base_url = env_or("AGILETEST_BASE_URL", defaults.base_url);
        agiletest.auth_base_url = env_or("AGILETEST_AUTH_BASE_URL", defaults.auth_base_url);
        agiletest.client_id = env_or("AGILETEST_CLIENT_ID", String::new());
        agiletest.client_secret = env_or("AGILETEST_CLIENT_SECRET", String::new());
        agiletest.data_center_token = env_or("AGILETEST_DC_TOKEN", String::new());
        agiletest.data_center = std::env::var("AGILETEST_DATA_CENTER")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        if let Ok(timeout) = std::env::var("AGILETEST_TIMEOUT") {
            agiletest.timeout_seconds = timeout.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "AGILETEST_TIMEOUT must be a whole number of seconds, got '{}'",
                    timeout
                ))
            })?;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level.to_lowercase();
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
