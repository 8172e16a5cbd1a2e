//! Authentication module
//!
//! Attaches AgileTest credentials to outbound requests.
//!
//! - Cloud: client credentials are exchanged for a short-lived JWT which is
//!   cached and refreshed when it expires or the server rejects it.
//! - Data center: a static personal access token is sent as a bearer token.

use crate::config::{AgileTestConfig, ConfigError};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use std::sync::Arc;
use thiserror::Error;

pub mod cloud;
pub mod data_center;
pub mod jwt;

pub use cloud::CloudAuthenticator;
pub use data_center::DataCenterAuthenticator;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to refresh token: {status} - {body}")]
    RefreshRejected { status: u16, body: String },

    #[error("Token request failed: {0}")]
    RefreshTransport(#[from] reqwest::Error),
}

/// Authenticator trait
///
/// Every upload request is built, passed through [`Authenticator::decorate`]
/// and sent. When the server answers 401 the transport rebuilds the request
/// and hands it to [`Authenticator::reauthorize`] for a single retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Attach a valid credential, refreshing the cached one first if needed
    async fn decorate(&self, request: RequestBuilder) -> Result<RequestBuilder, AuthError>;

    /// Recover from a 401 by forcing a refresh.
    ///
    /// Returns `None` when the scheme has nothing to refresh, in which case
    /// the rejected response is final.
    async fn reauthorize(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<RequestBuilder>, AuthError>;

    /// Authorization scheme name, for logging
    fn scheme(&self) -> &'static str;
}

/// Build the authenticator matching the configured deployment mode
pub fn from_config(
    config: &AgileTestConfig,
    client: reqwest::Client,
) -> Result<Arc<dyn Authenticator>, ConfigError> {
    if config.data_center {
        Ok(Arc::new(DataCenterAuthenticator::new(
            &config.data_center_token,
        )?))
    } else {
        Ok(Arc::new(CloudAuthenticator::new(
            &config.client_id,
            &config.client_secret,
            &config.auth_base_url,
            client,
        )?))
    }
}
