//! AgileTest upload client
//!
//! # Example
//!
//! ```no_run
//! use agiletest_uploadr::{client::UploadClient, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = UploadClient::new(&config)?;
//!
//!     let outcome = client
//!         .upload_text_payload("junit", "TC", "<testsuite/>", Some("TC-202"))
//!         .await?;
//!     println!("uploaded: {}", outcome.is_success());
//!     Ok(())
//! }
//! ```

use crate::auth::{self, AuthError, Authenticator};
use crate::config::{Config, ConfigError, FileTypeConfig};
use crate::upload::multipart::MultipartImport;
use crate::upload::{interpret_response, Endpoints, Framework, ResultFileType, UploadOutcome};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub mod transport;

pub use transport::AuthenticatedTransport;

/// Upload client errors
///
/// Rejected uploads are not errors; see [`UploadOutcome::Failure`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Client for the AgileTest automation import API
pub struct UploadClient {
    transport: AuthenticatedTransport,
    endpoints: Endpoints,
    file_types: FileTypeConfig,
}

impl UploadClient {
    /// Create a client for the configured deployment mode
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = Self::http_client(config)?;
        let authenticator = auth::from_config(&config.agiletest, http.clone())?;
        Ok(Self::with_parts(config, http, authenticator))
    }

    /// Create a client with a custom authenticator
    pub fn with_authenticator(
        config: &Config,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self, ClientError> {
        let http = Self::http_client(config)?;
        Ok(Self::with_parts(config, http, authenticator))
    }

    fn with_parts(
        config: &Config,
        http: reqwest::Client,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            transport: AuthenticatedTransport::new(http, authenticator),
            endpoints: Endpoints::new(&config.agiletest.base_url, config.agiletest.data_center),
            file_types: config.file_types.clone(),
        }
    }

    fn http_client(config: &Config) -> Result<reqwest::Client, ClientError> {
        Ok(reqwest::Client::builder()
            .timeout(Duration::from_secs(config.agiletest.timeout_seconds))
            .user_agent(concat!("agiletest-uploadr/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Validate a framework identifier and resolve its result file type.
    ///
    /// Pure lookup: no network access, same answer every time.
    pub fn resolve_framework(
        &self,
        framework: &str,
    ) -> Result<(Framework, ResultFileType), ConfigError> {
        let framework: Framework = framework.parse()?;
        let file_type = self.file_types.resolve(framework)?;
        Ok((framework, file_type))
    }

    /// Import a result file sent as the raw request body
    #[tracing::instrument(
        name = "upload.text",
        skip(self, payload),
        fields(data_center = self.endpoints.is_data_center()),
        err
    )]
    pub async fn upload_text_payload(
        &self,
        framework: &str,
        project_key: &str,
        payload: impl Into<Bytes>,
        execution_key: Option<&str>,
    ) -> Result<UploadOutcome, ClientError> {
        let (framework, file_type) = self.resolve_framework(framework)?;
        let payload: Bytes = payload.into();

        let url = self.endpoints.url(&self.endpoints.text_upload_path(framework));
        let mut params = vec![("projectKey", project_key)];
        if let Some(key) = execution_key.filter(|key| !key.is_empty()) {
            params.push(("testExecutionKey", key));
        }

        let response = self
            .transport
            .send(|client| {
                Ok(client
                    .post(&url)
                    .query(&params)
                    .header(CONTENT_TYPE, file_type.mime_type.as_str())
                    .body(payload.clone()))
            })
            .await?;

        Ok(interpret_response(response).await?)
    }

    /// Import a result file together with a test execution info document
    #[tracing::instrument(
        name = "upload.multipart",
        skip(self, results, execution_info),
        fields(data_center = self.endpoints.is_data_center()),
        err
    )]
    pub async fn upload_multipart(
        &self,
        framework: &str,
        results: impl Into<Bytes>,
        execution_info: impl Into<Bytes>,
    ) -> Result<UploadOutcome, ClientError> {
        let (framework, file_type) = self.resolve_framework(framework)?;
        let info_mime = self
            .file_types
            .mime_type("json")
            .ok_or_else(|| ConfigError::MissingMimeType("json".into()))?;

        let import = MultipartImport::new(file_type, results, execution_info, info_mime);
        // Surface a bad MIME type as configuration, not transport
        import
            .form()
            .map_err(|e| ConfigError::ValidationError(format!("Invalid MIME type: {}", e)))?;

        let url = self.endpoints.url(&self.endpoints.multipart_path(framework));
        let response = self
            .transport
            .send(|client| Ok(client.post(&url).multipart(import.form()?)))
            .await?;

        Ok(interpret_response(response).await?)
    }

    /// Read a result file from disk and import it with [`Self::upload_text_payload`]
    pub async fn upload_text_file(
        &self,
        framework: &str,
        project_key: &str,
        path: &Path,
        execution_key: Option<&str>,
    ) -> Result<UploadOutcome, ClientError> {
        self.resolve_framework(framework)?;
        let payload = read_file(path).await?;
        self.upload_text_payload(framework, project_key, payload, execution_key)
            .await
    }

    /// Read both files from disk and import them with [`Self::upload_multipart`]
    pub async fn upload_multipart_files(
        &self,
        framework: &str,
        results_path: &Path,
        execution_info_path: &Path,
    ) -> Result<UploadOutcome, ClientError> {
        self.resolve_framework(framework)?;
        let results = read_file(results_path).await?;
        let execution_info = read_file(execution_info_path).await?;
        self.upload_multipart(framework, results, execution_info)
            .await
    }
}

async fn read_file(path: &Path) -> Result<Bytes, ClientError> {
    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(|source| ClientError::Io {
            path: path.display().to_string(),
            source,
        })
}
