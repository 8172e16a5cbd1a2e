//! Configuration module for AgileTest Uploadr
//!
//! Handles loading and parsing of YAML configuration files with support for
//! environment variable expansion and validation, plus an environment-only
//! loader for CI pipelines that never write a config file.

use crate::upload::framework::{Framework, ResultFileType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in a string.
///
/// Supports two syntaxes:
/// - `${VAR_NAME}` - Simple expansion, keeps placeholder if var not found
/// - `${VAR_NAME:-default}` - Expansion with default value (may be empty)
///
/// Variable names must start with a letter or underscore and contain only
/// uppercase letters, digits, and underscores.
///
/// # Examples
///
/// ```ignore
/// std::env::set_var("MY_VAR", "value");
/// let result = expand_env_vars("prefix-${MY_VAR}-suffix");
/// assert_eq!(result, "prefix-value-suffix");
///
/// let result = expand_env_vars("${MISSING:-default}");
/// assert_eq!(result, "default");
/// ```
pub(crate) fn expand_env_vars(s: &str) -> String {
    let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(:-([^}]*))?\}") {
        Ok(re) => re,
        Err(_) => return s.to_string(),
    };
    let mut last_match = 0;
    let mut result = String::with_capacity(s.len());

    for cap in re.captures_iter(s) {
        let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        result.push_str(&s[last_match..full_match.start()]);

        let value = match std::env::var(var_name.as_str()) {
            Ok(val) => val,
            Err(_) => match cap.get(3) {
                Some(default) => default.as_str().to_string(),
                // No env var and no default. Keep the original placeholder.
                None => full_match.as_str().to_string(),
            },
        };
        result.push_str(&value);

        last_match = full_match.end();
    }

    result.push_str(&s[last_match..]);

    result
}

// ============================================================================
// Validation Helpers
// ============================================================================

/// Validate that a URL starts with http:// or https://
fn is_valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Invalid test execution type: {value}. Supported frameworks: {supported}")]
    UnsupportedFramework { value: String, supported: String },

    #[error("Extension not found for framework type {0}")]
    MissingExtension(String),

    #[error("Mime type not found for extension {0}")]
    MissingMimeType(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agiletest: AgileTestConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub file_types: FileTypeConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        ConfigLoader::load(path)
    }

    /// Load configuration from `AGILETEST_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        ConfigLoader::from_env()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let agiletest = &self.agiletest;

        if !is_valid_http_url(&agiletest.base_url) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid base_url '{}': must start with http:// or https://",
                agiletest.base_url
            )));
        }

        if !is_valid_http_url(&agiletest.auth_base_url) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid auth_base_url '{}': must start with http:// or https://",
                agiletest.auth_base_url
            )));
        }

        if agiletest.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_seconds must be greater than zero".into(),
            ));
        }

        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format '{}': must be 'text' or 'json'",
                    other
                )))
            }
        }

        Ok(())
    }
}

/// AgileTest connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgileTestConfig {
    /// API base URL. Cloud uploads go to `/ds/...`, data center to `/rest/...`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL of the API key exchange service (cloud only)
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,

    /// Per-request timeout in seconds. Default: 30
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Use the data center API and a static token instead of client credentials
    #[serde(default)]
    pub data_center: bool,

    #[serde(default)]
    pub client_id: String,

    #[serde(default, skip_serializing)]
    pub client_secret: String,

    #[serde(default, skip_serializing)]
    pub data_center_token: String,
}

impl Default for AgileTestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_base_url: default_auth_base_url(),
            timeout_seconds: default_timeout_seconds(),
            data_center: false,
            client_id: String::new(),
            client_secret: String::new(),
            data_center_token: String::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.agiletest.app".to_string()
}

fn default_auth_base_url() -> String {
    "https://agiletest.atlas.devsamurai.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter, overridden by RUST_LOG. Default: "info"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "text" or "json". Default: "text"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Result file type lookup tables.
///
/// Resolution is two-step: framework -> file extension -> MIME type. Entries
/// from the config file are merged over the built-in defaults.
///
/// # Example
///
/// ```yaml
/// file_types:
///   extensions:
///     junit: xml
///   mime_types:
///     xml: text/xml
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeConfig {
    #[serde(default = "default_extensions", deserialize_with = "merge_extensions")]
    pub extensions: BTreeMap<String, String>,

    #[serde(default = "default_mime_types", deserialize_with = "merge_mime_types")]
    pub mime_types: BTreeMap<String, String>,
}

impl Default for FileTypeConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            mime_types: default_mime_types(),
        }
    }
}

impl FileTypeConfig {
    /// Resolve the result file extension and MIME type for a framework
    pub fn resolve(&self, framework: Framework) -> Result<ResultFileType, ConfigError> {
        let extension = self
            .extensions
            .get(framework.as_str())
            .ok_or_else(|| ConfigError::MissingExtension(framework.to_string()))?;
        let mime_type = self
            .mime_types
            .get(extension)
            .ok_or_else(|| ConfigError::MissingMimeType(extension.clone()))?;

        Ok(ResultFileType {
            extension: extension.clone(),
            mime_type: mime_type.clone(),
        })
    }

    /// MIME type registered for an extension
    pub fn mime_type(&self, extension: &str) -> Option<&str> {
        self.mime_types.get(extension).map(String::as_str)
    }
}

fn default_extensions() -> BTreeMap<String, String> {
    Framework::ALL
        .iter()
        .map(|framework| {
            (
                framework.as_str().to_string(),
                framework.default_extension().to_string(),
            )
        })
        .collect()
}

fn default_mime_types() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("xml".to_string(), "application/xml".to_string()),
        ("json".to_string(), "application/json".to_string()),
    ])
}

fn merge_extensions<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut merged = default_extensions();
    merged.extend(
        overrides
            .into_iter()
            .map(|(framework, ext)| (framework.to_lowercase(), ext)),
    );
    Ok(merged)
}

fn merge_mime_types<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut merged = default_mime_types();
    merged.extend(overrides);
    Ok(merged)
}
