//! Multipart import form
//!
//! A multipart import carries two file parts: the framework result file and
//! a JSON document describing the test execution to create or update.

use super::ResultFileType;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};

/// Form field holding the result file
pub const RESULTS_PART: &str = "results";

/// Form field holding the execution info document
pub const TEST_EXECUTION_PART: &str = "testExecution";

/// File name of the execution info part (only JSON is accepted)
pub const EXECUTION_INFO_FILE_NAME: &str = "info.json";

/// Payloads of a multipart import
///
/// Forms are consumed when sent, so a fresh one is built for every attempt.
#[derive(Debug, Clone)]
pub struct MultipartImport {
    file_type: ResultFileType,
    results: Bytes,
    execution_info: Bytes,
    execution_info_mime: String,
}

impl MultipartImport {
    pub fn new(
        file_type: ResultFileType,
        results: impl Into<Bytes>,
        execution_info: impl Into<Bytes>,
        execution_info_mime: &str,
    ) -> Self {
        Self {
            file_type,
            results: results.into(),
            execution_info: execution_info.into(),
            execution_info_mime: execution_info_mime.to_string(),
        }
    }

    pub fn file_type(&self) -> &ResultFileType {
        &self.file_type
    }

    /// Build the multipart form
    pub fn form(&self) -> reqwest::Result<Form> {
        let results = Part::bytes(self.results.to_vec())
            .file_name(self.file_type.results_file_name())
            .mime_str(&self.file_type.mime_type)?;

        let execution_info = Part::bytes(self.execution_info.to_vec())
            .file_name(EXECUTION_INFO_FILE_NAME)
            .mime_str(&self.execution_info_mime)?;

        Ok(Form::new()
            .part(RESULTS_PART, results)
            .part(TEST_EXECUTION_PART, execution_info))
    }
}
