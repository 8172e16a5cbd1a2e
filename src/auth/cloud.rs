//! AgileTest cloud authentication
//!
//! Exchanges a client id and secret for a JWT at
//! `{auth_base_url}/api/apikeys/authenticate` and caches it.
//!
//! # Example
//!
//! ```no_run
//! use agiletest_uploadr::auth::CloudAuthenticator;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = CloudAuthenticator::new(
//!     "client-id",
//!     "client-secret",
//!     "https://agiletest.atlas.devsamurai.com",
//!     reqwest::Client::new(),
//! )?;
//! # Ok(())
//! # }
//! ```

use super::jwt::CachedToken;
use super::{AuthError, Authenticator};
use crate::config::ConfigError;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use serde::Serialize;
use tokio::sync::Mutex;

/// Path of the API key exchange endpoint
pub const AUTHENTICATE_PATH: &str = "/api/apikeys/authenticate";

/// Token exchange request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticateRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

/// Client-credential authenticator for AgileTest cloud
///
/// The cached token lives behind a mutex that is held across the validity
/// check and the refresh, so concurrent callers holding an expired token
/// wait for a single exchange instead of each starting their own.
pub struct CloudAuthenticator {
    client_id: String,
    client_secret: String,
    auth_base_url: String,

    /// HTTP client for the token exchange
    client: reqwest::Client,

    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for CloudAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudAuthenticator")
            .field("client_id", &self.client_id)
            .field("auth_base_url", &self.auth_base_url)
            .finish_non_exhaustive()
    }
}

impl CloudAuthenticator {
    /// Create a cloud authenticator with an empty token cache
    pub fn new(
        client_id: &str,
        client_secret: &str,
        auth_base_url: &str,
        client: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "Client ID and Client Secret are required for Cloud version".into(),
            ));
        }

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            auth_base_url: auth_base_url.trim_end_matches('/').to_string(),
            client,
            token: Mutex::new(None),
        })
    }

    /// Seed the cache with a previously issued token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        *self.token.get_mut() = Some(CachedToken::new(token));
        self
    }

    /// Currently cached token, valid or not
    pub async fn cached_token(&self) -> Option<String> {
        let token = self.token.lock().await;
        token.as_ref().map(|t| t.value().to_string())
    }

    fn authenticate_url(&self) -> String {
        format!("{}{}", self.auth_base_url, AUTHENTICATE_PATH)
    }

    /// Exchange the client credentials for a new token
    async fn fetch_token(&self) -> Result<CachedToken, AuthError> {
        tracing::debug!(
            client_id = %self.client_id,
            "Building refresh request"
        );

        let response = self
            .client
            .post(self.authenticate_url())
            .json(&AuthenticateRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Failed to refresh token"
            );
            return Err(AuthError::RefreshRejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = CachedToken::new(body.trim());
        tracing::debug!(
            token_len = token.value().len(),
            expires_at = ?token.expires_at(),
            "Received new token"
        );

        Ok(token)
    }

    /// Return the cached token, refreshing it first if it is not valid
    async fn valid_token(&self) -> Result<String, AuthError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.value().to_string());
        }

        tracing::debug!("Refreshing token");
        let token = self.fetch_token().await?;
        let value = token.value().to_string();
        *cached = Some(token);
        Ok(value)
    }

    /// Replace the cached token unconditionally
    async fn refresh(&self) -> Result<String, AuthError> {
        let mut cached = self.token.lock().await;
        let token = self.fetch_token().await?;
        let value = token.value().to_string();
        *cached = Some(token);
        Ok(value)
    }

    fn attach(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("{} {}", self.scheme(), token))
    }
}

#[async_trait]
impl Authenticator for CloudAuthenticator {
    #[tracing::instrument(name = "auth.cloud.decorate", skip_all, err)]
    async fn decorate(&self, request: RequestBuilder) -> Result<RequestBuilder, AuthError> {
        let token = self.valid_token().await?;
        Ok(self.attach(request, &token))
    }

    #[tracing::instrument(name = "auth.cloud.reauthorize", skip_all, err)]
    async fn reauthorize(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<RequestBuilder>, AuthError> {
        tracing::debug!("Request unauthorized, refreshing token");
        let token = self.refresh().await?;
        Ok(Some(self.attach(request, &token)))
    }

    fn scheme(&self) -> &'static str {
        "JWT"
    }
}
