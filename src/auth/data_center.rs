//! AgileTest data center authentication
//!
//! Data center installs authenticate with a static personal access token;
//! there is no exchange and nothing to refresh.

use super::{AuthError, Authenticator};
use crate::config::ConfigError;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;

/// Static bearer token authenticator
pub struct DataCenterAuthenticator {
    token: String,
}

impl std::fmt::Debug for DataCenterAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCenterAuthenticator").finish_non_exhaustive()
    }
}

impl DataCenterAuthenticator {
    pub fn new(token: &str) -> Result<Self, ConfigError> {
        if token.is_empty() {
            return Err(ConfigError::ValidationError(
                "AGILETEST_DC_TOKEN is required in Data Center mode".into(),
            ));
        }

        Ok(Self {
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl Authenticator for DataCenterAuthenticator {
    async fn decorate(&self, request: RequestBuilder) -> Result<RequestBuilder, AuthError> {
        Ok(request.header(AUTHORIZATION, format!("{} {}", self.scheme(), self.token)))
    }

    async fn reauthorize(
        &self,
        _request: RequestBuilder,
    ) -> Result<Option<RequestBuilder>, AuthError> {
        Ok(None)
    }

    fn scheme(&self) -> &'static str {
        "Bearer"
    }
}
