//! AgileTest Uploadr Library
//!
//! Upload automated test results (JUnit XML, Cucumber JSON, ...) to AgileTest.
//!
//! # Features
//!
//! - **Cloud**: client credentials exchanged for a cached, auto-refreshed JWT
//! - **Data Center**: static bearer token
//! - **Two import styles**: raw result file, or multipart with execution info
//! - **Single retry**: a 401 triggers one token refresh and one resend
//!
//! # Example
//!
//! ```no_run
//! use agiletest_uploadr::{client::UploadClient, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("agiletest.yaml")?;
//!     let client = UploadClient::new(&config)?;
//!     let outcome = client
//!         .upload_text_payload("junit", "TC", "<testsuite/>", None)
//!         .await?;
//!     assert!(outcome.is_success());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod logging;
pub mod upload;

// Re-export commonly used types
pub use client::{ClientError, UploadClient};
pub use config::Config;
pub use upload::{Framework, TestExecution, UploadOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
