//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use plugpack_core::ArchiveManifest;
use plugpack_core::AuditReport;
use plugpack_core::PackageReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    name: &'a str,
    size: u64,
    compressed_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<u32>,
    is_dir: bool,
}

fn entries(manifest: &ArchiveManifest) -> Vec<EntryOutput<'_>> {
    manifest
        .entries
        .iter()
        .map(|e| EntryOutput {
            name: &e.name,
            size: e.size,
            compressed_size: e.compressed_size,
            mode: e.mode,
            is_dir: e.is_dir,
        })
        .collect()
}

impl OutputFormatter for JsonFormatter {
    fn format_package_result(&self, report: &PackageReport) -> Result<()> {
        #[derive(Serialize)]
        struct PackageOutput {
            archive_path: String,
            archive_name: String,
            plugin_folder: String,
            main_file: String,
            plugin_name: String,
            header_verified: bool,
            dependencies_found: bool,
            files_copied: usize,
            entries_excluded: usize,
            archive_entries: usize,
            bytes_written: u64,
            archive_size: u64,
            duration_ms: u128,
            warnings: Vec<String>,
        }

        let data = PackageOutput {
            archive_path: report.archive_path.display().to_string(),
            archive_name: report.archive_name(),
            plugin_folder: report.plugin_folder.clone(),
            main_file: report.main_file.clone(),
            plugin_name: report.plugin_name.clone(),
            header_verified: report.header_verified,
            dependencies_found: report.dependencies_found,
            files_copied: report.files_copied,
            entries_excluded: report.entries_excluded,
            archive_entries: report.archive_entries,
            bytes_written: report.bytes_written,
            archive_size: report.archive_size,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
        };

        Self::output(&JsonOutput::success("build", data))
    }

    fn format_verification(
        &self,
        archive: &Path,
        expected: &str,
        manifest: &ArchiveManifest,
        audit: Option<&AuditReport>,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct AuditOutput {
            entries_checked: usize,
            issues: Vec<String>,
        }

        #[derive(Serialize)]
        struct VerifyOutput<'a> {
            archive: String,
            expected_entry: &'a str,
            total_entries: usize,
            total_size: u64,
            #[serde(skip_serializing_if = "Option::is_none")]
            audit: Option<AuditOutput>,
        }

        let data = VerifyOutput {
            archive: archive.display().to_string(),
            expected_entry: expected,
            total_entries: manifest.total_entries,
            total_size: manifest.total_size,
            audit: audit.map(|a| AuditOutput {
                entries_checked: a.entries_checked,
                issues: a.issues.iter().map(ToString::to_string).collect(),
            }),
        };

        let output = match audit {
            Some(a) if !a.is_clean() => JsonOutput::failure(
                "verify",
                data,
                format!("{} audit issue(s) found", a.issues.len()),
            ),
            _ => JsonOutput::success("verify", data),
        };
        Self::output(&output)
    }

    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()> {
        let names: Vec<&str> = manifest.entries.iter().map(|e| e.name.as_str()).collect();
        Self::output(&JsonOutput::success("list", names))
    }

    fn format_manifest_long(
        &self,
        manifest: &ArchiveManifest,
        _human_readable: bool,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            total_entries: usize,
            total_size: u64,
            entries: Vec<EntryOutput<'a>>,
        }

        let data = ListOutput {
            total_entries: manifest.total_entries,
            total_size: manifest.total_size,
            entries: entries(manifest),
        };
        Self::output(&JsonOutput::success("list", data))
    }

    fn format_warning(&self, message: &str) {
        let _ = writeln!(io::stderr(), "warning: {message}");
    }
}
