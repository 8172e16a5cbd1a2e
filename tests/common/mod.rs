//! Common test infrastructure
//!
//! Provides shared utilities for integration tests:
//! - Configs pointed at a mock AgileTest server
//! - JWT token generation
//! - Token endpoint mocks

#![allow(dead_code)]

use agiletest_uploadr::auth::jwt::Claims;
use agiletest_uploadr::config::Config;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const DC_TOKEN: &str = "dc-personal-access-token";

pub const JUNIT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="login" tests="1" failures="0">
  <testcase classname="auth.LoginTest" name="test_valid_login" time="0.12"/>
</testsuite>"#;

pub const EXECUTION_INFO: &str = r#"{"fields":{"summary":"Nightly regression","project":{"key":"TC"}}}"#;

/// Create a token expiring `seconds` from now (negative for expired)
pub fn jwt_expiring_in(seconds: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        exp: Some(now + seconds),
        iat: Some(now),
        sub: Some(CLIENT_ID.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"agiletest-server-secret"),
    )
    .unwrap()
}

/// Cloud config whose API and auth endpoints both point at the mock server
pub fn cloud_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.agiletest.base_url = server.uri();
    config.agiletest.auth_base_url = server.uri();
    config.agiletest.client_id = CLIENT_ID.to_string();
    config.agiletest.client_secret = CLIENT_SECRET.to_string();
    config.agiletest.timeout_seconds = 5;
    config
}

/// Data center config pointed at the mock server
pub fn data_center_config(server: &MockServer) -> Config {
    let mut config = cloud_config(server);
    config.agiletest.data_center = true;
    config.agiletest.data_center_token = DC_TOKEN.to_string();
    config
}

/// Mount the token exchange endpoint, expecting `calls` exchanges
pub async fn mount_token_endpoint(server: &MockServer, token: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/apikeys/authenticate"))
        .and(body_json(json!({
            "clientId": CLIENT_ID,
            "clientSecret": CLIENT_SECRET
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(token))
        .expect(calls)
        .mount(server)
        .await;
}

/// Typical successful import response
pub fn execution_response(key: &str, missed_cases: &[&str]) -> serde_json::Value {
    json!({
        "key": key,
        "url": format!("https://example.atlassian.net/browse/{}", key),
        "missedCases": missed_cases,
    })
}
