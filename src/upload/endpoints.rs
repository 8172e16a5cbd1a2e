//! AgileTest automation import endpoints
//!
//! Cloud and data center expose the same imports under different paths.

use super::Framework;

/// Endpoint resolver for one AgileTest deployment
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
    data_center: bool,
}

impl Endpoints {
    pub fn new(base_url: &str, data_center: bool) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            data_center,
        }
    }

    pub fn is_data_center(&self) -> bool {
        self.data_center
    }

    /// Path for a raw-body import of a result file
    pub fn text_upload_path(&self, framework: Framework) -> String {
        if self.data_center {
            format!("/rest/agiletest/1.0/test-executions/automation/{}", framework)
        } else {
            format!("/ds/test-executions/{}", framework)
        }
    }

    /// Path for a multipart import of a result file plus execution info
    pub fn multipart_path(&self, framework: Framework) -> String {
        if self.data_center {
            format!("/plugins/servlet/agiletest/automation/multipart/{}", framework)
        } else {
            format!("/ds/test-executions/{}/multipart", framework)
        }
    }

    /// Absolute URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
