//! Output formatter trait for CLI results.

use anyhow::Result;
use plugpack_core::ArchiveManifest;
use plugpack_core::AuditReport;
use plugpack_core::PackageReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a packaging run
    fn format_package_result(&self, report: &PackageReport) -> Result<()>;

    /// Format a verified archive layout, with the audit when one was run
    fn format_verification(
        &self,
        archive: &Path,
        expected: &str,
        manifest: &ArchiveManifest,
        audit: Option<&AuditReport>,
    ) -> Result<()>;

    /// Format archive listing (names only)
    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()>;

    /// Format archive listing with sizes and modes
    fn format_manifest_long(&self, manifest: &ArchiveManifest, human_readable: bool)
    -> Result<()>;

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

    pub fn failure(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}
