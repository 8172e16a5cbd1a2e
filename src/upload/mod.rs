//! Upload module
//!
//! Request shapes and response handling for AgileTest automation imports.

use serde::{Deserialize, Serialize};

pub mod endpoints;
pub mod framework;
pub mod multipart;

pub use endpoints::Endpoints;
pub use framework::{Framework, ResultFileType};

/// Test execution returned by a successful import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestExecution {
    /// Jira issue key of the test execution
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// Test cases the server could not match or import
    #[serde(default, deserialize_with = "null_as_default")]
    pub missed_cases: Vec<serde_json::Value>,

    /// Any other fields of the response body
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of an upload
///
/// Server rejections and unreadable bodies are reported as `Failure` rather
/// than as errors; the details are logged when the response is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success(TestExecution),
    Failure,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }

    pub fn execution(&self) -> Option<&TestExecution> {
        match self {
            UploadOutcome::Success(execution) => Some(execution),
            UploadOutcome::Failure => None,
        }
    }

    pub fn into_execution(self) -> Option<TestExecution> {
        match self {
            UploadOutcome::Success(execution) => Some(execution),
            UploadOutcome::Failure => None,
        }
    }
}

/// Turn an upload response into an outcome.
///
/// Only a 2xx status with a JSON object body counts as success.
pub async fn interpret_response(response: reqwest::Response) -> Result<UploadOutcome, reqwest::Error> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = status.as_u16(),
            body = %body,
            "Request Error"
        );
        return Ok(UploadOutcome::Failure);
    }

    Ok(parse_execution(&body))
}

fn parse_execution(body: &str) -> UploadOutcome {
    let execution: TestExecution = match serde_json::from_str(body) {
        Ok(execution) => execution,
        Err(e) => {
            tracing::error!(
                error = %e,
                body = %body,
                "Response invalid JSON response"
            );
            return UploadOutcome::Failure;
        }
    };

    tracing::info!(body = %body, "Test execution uploaded successfully");

    if !execution.missed_cases.is_empty() {
        tracing::warn!(
            key = %execution.key,
            missed_cases = ?execution.missed_cases,
            "Test execution with missed test cases"
        );
    }

    tracing::info!(
        key = %execution.key,
        url = %execution.url,
        "Test Execution issue updated"
    );

    UploadOutcome::Success(execution)
}
