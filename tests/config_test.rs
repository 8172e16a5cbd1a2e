//! Tests for configuration loading
//!
//! YAML parsing, environment variable expansion, file type overrides and
//! the environment-only loader.

use agiletest_uploadr::config::{Config, ConfigError, ConfigLoader};
use agiletest_uploadr::Framework;
use serial_test::serial;
use std::io::Write;

const ENV_VARS: [&str; 8] = [
    "AGILETEST_BASE_URL",
    "AGILETEST_AUTH_BASE_URL",
    "AGILETEST_CLIENT_ID",
    "AGILETEST_CLIENT_SECRET",
    "AGILETEST_DATA_CENTER",
    "AGILETEST_DC_TOKEN",
    "AGILETEST_TIMEOUT",
    "LOG_LEVEL",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_parse_full_config_from_file() {
    let file = write_config(
        r#"
agiletest:
  base_url: "https://jira.example.com"
  auth_base_url: "https://auth.example.com"
  timeout_seconds: 60
  data_center: true
  data_center_token: "pat-123"

logging:
  level: "debug"
  format: "json"

file_types:
  extensions:
    JUnit: junitxml
  mime_types:
    junitxml: text/xml
"#,
    );

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.agiletest.base_url, "https://jira.example.com");
    assert_eq!(config.agiletest.auth_base_url, "https://auth.example.com");
    assert_eq!(config.agiletest.timeout_seconds, 60);
    assert!(config.agiletest.data_center);
    assert_eq!(config.agiletest.data_center_token, "pat-123");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");

    let junit = config.file_types.resolve(Framework::Junit).unwrap();
    assert_eq!(junit.extension, "junitxml");
    assert_eq!(junit.mime_type, "text/xml");

    // Overrides merge with the defaults
    let cucumber = config.file_types.resolve(Framework::Cucumber).unwrap();
    assert_eq!(cucumber.mime_type, "application/json");
}

#[test]
fn test_empty_file_uses_defaults() {
    let config = ConfigLoader::from_yaml("{}").unwrap();

    assert_eq!(config.agiletest.base_url, "https://api.agiletest.app");
    assert_eq!(
        config.agiletest.auth_base_url,
        "https://agiletest.atlas.devsamurai.com"
    );
    assert_eq!(config.agiletest.timeout_seconds, 30);
    assert!(!config.agiletest.data_center);
    assert_eq!(config.logging.format, "text");
    assert_eq!(
        config.file_types.resolve(Framework::Testng).unwrap().mime_type,
        "application/xml"
    );
}

#[test]
#[serial]
fn test_secrets_expanded_from_env() {
    clear_env();
    std::env::set_var("AGILETEST_CLIENT_ID", "ci-client");
    std::env::set_var("AGILETEST_CLIENT_SECRET", "ci-secret");

    let config = ConfigLoader::from_yaml(
        r#"
agiletest:
  client_id: "${AGILETEST_CLIENT_ID}"
  client_secret: "${AGILETEST_CLIENT_SECRET}"
  data_center_token: "${AGILETEST_DC_TOKEN:-}"
"#,
    )
    .unwrap();

    assert_eq!(config.agiletest.client_id, "ci-client");
    assert_eq!(config.agiletest.client_secret, "ci-secret");
    assert_eq!(config.agiletest.data_center_token, "");
    clear_env();
}

#[test]
fn test_invalid_url_rejected() {
    let result = ConfigLoader::from_yaml(
        r#"
agiletest:
  base_url: "ftp://api.agiletest.app"
"#,
    );

    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_malformed_yaml_rejected() {
    let result = ConfigLoader::from_yaml("agiletest: [unclosed");
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Config::load("/nonexistent/agiletest.yaml");
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}

#[test]
#[serial]
fn test_from_env() {
    clear_env();
    std::env::set_var("AGILETEST_BASE_URL", "https://jira.internal");
    std::env::set_var("AGILETEST_DATA_CENTER", "true");
    std::env::set_var("AGILETEST_DC_TOKEN", "pat-456");
    std::env::set_var("AGILETEST_TIMEOUT", "90");
    std::env::set_var("LOG_LEVEL", "DEBUG");

    let config = Config::from_env().unwrap();

    assert_eq!(config.agiletest.base_url, "https://jira.internal");
    assert!(config.agiletest.data_center);
    assert_eq!(config.agiletest.data_center_token, "pat-456");
    assert_eq!(config.agiletest.timeout_seconds, 90);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.agiletest.auth_base_url,
        "https://agiletest.atlas.devsamurai.com"
    );
    clear_env();
}

#[test]
#[serial]
fn test_from_env_bad_timeout() {
    clear_env();
    std::env::set_var("AGILETEST_TIMEOUT", "soon");

    let result = Config::from_env();

    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    clear_env();
}
