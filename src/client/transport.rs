//! Authenticated request transport
//!
//! Sends requests through an [`Authenticator`] and retries exactly once
//! when the server answers 401 and the authenticator can refresh.

use super::ClientError;
use crate::auth::Authenticator;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::sync::Arc;

/// HTTP client wrapper that decorates every request with credentials
#[derive(Clone)]
pub struct AuthenticatedTransport {
    client: reqwest::Client,
    auth: Arc<dyn Authenticator>,
}

impl AuthenticatedTransport {
    pub fn new(client: reqwest::Client, auth: Arc<dyn Authenticator>) -> Self {
        Self { client, auth }
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.auth
    }

    /// Build, decorate and send a request.
    ///
    /// `build` is called again for the retry, since request bodies such as
    /// multipart forms cannot be replayed.
    pub async fn send<F>(&self, build: F) -> Result<Response, ClientError>
    where
        F: Fn(&reqwest::Client) -> Result<RequestBuilder, ClientError>,
    {
        let request = self.auth.decorate(build(&self.client)?).await?;
        let response = request.send().await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(
            scheme = self.auth.scheme(),
            url = %response.url(),
            "Server rejected credentials"
        );

        match self.auth.reauthorize(build(&self.client)?).await? {
            Some(retry) => Ok(retry.send().await?),
            None => Ok(response),
        }
    }
}
