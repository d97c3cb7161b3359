//! Output formatter trait for CLI results.

use anyhow::Result;
use sdist_core::SdistReport;
use sdist_core::inspection::SdistEntry;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of checking one path against the exclusion rules.
#[derive(Debug, Clone, Serialize)]
pub struct IgnoreVerdict {
    pub path: PathBuf,
    pub excluded: bool,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a build
    fn format_build_result(&self, report: &SdistReport) -> Result<()>;

    /// Format the members of an archive
    fn format_listing(&self, entries: &[SdistEntry], long: bool) -> Result<()>;

    /// Format exclusion checks
    fn format_ignore_verdicts(&self, verdicts: &[IgnoreVerdict]) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
