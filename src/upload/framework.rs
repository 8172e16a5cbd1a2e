//! Supported test result frameworks

use crate::config::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Test framework whose result format AgileTest can import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    Junit,
    Nunit,
    Xunit,
    Testng,
    Robot,
    Cucumber,
    Behave,
}

impl Framework {
    /// Every supported framework, in the order shown to users
    pub const ALL: [Framework; 7] = [
        Framework::Junit,
        Framework::Nunit,
        Framework::Xunit,
        Framework::Testng,
        Framework::Robot,
        Framework::Cucumber,
        Framework::Behave,
    ];

    /// Identifier used in API paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Junit => "junit",
            Framework::Nunit => "nunit",
            Framework::Xunit => "xunit",
            Framework::Testng => "testng",
            Framework::Robot => "robot",
            Framework::Cucumber => "cucumber",
            Framework::Behave => "behave",
        }
    }

    /// Built-in result file extension
    pub fn default_extension(&self) -> &'static str {
        match self {
            Framework::Cucumber | Framework::Behave => "json",
            _ => "xml",
        }
    }

    /// Comma separated list of supported identifiers
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(Framework::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|framework| framework.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnsupportedFramework {
                value: normalized,
                supported: Self::supported(),
            })
    }
}

/// Resolved extension and MIME type of a result file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFileType {
    pub extension: String,
    pub mime_type: String,
}

impl ResultFileType {
    /// File name used for the results part of a multipart upload
    pub fn results_file_name(&self) -> String {
        format!("results.{}", self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("JUnit".parse::<Framework>().unwrap(), Framework::Junit);
        assert_eq!(" cucumber ".parse::<Framework>().unwrap(), Framework::Cucumber);
    }

    #[test]
    fn test_unsupported_framework_names_value_and_supported_set() {
        let err = "pytest".parse::<Framework>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("pytest"), "{}", message);
        assert!(message.contains("junit"), "{}", message);
        assert!(message.contains("behave"), "{}", message);
    }

    #[test]
    fn test_round_trip_identifiers() {
        for framework in Framework::ALL {
            assert_eq!(framework.as_str().parse::<Framework>().unwrap(), framework);
        }
    }

    #[test]
    fn test_results_file_name() {
        let file_type = ResultFileType {
            extension: "xml".into(),
            mime_type: "application/xml".into(),
        };
        assert_eq!(file_type.results_file_name(), "results.xml");
    }
}
