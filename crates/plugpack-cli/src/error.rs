//! Error conversion utilities for CLI.
//!
//! Converts plugpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use plugpack_core::PackageError;
use plugpack_core::PackageConfig;

/// Converts `PackageError` to a user-friendly anyhow error with context
pub fn convert_package_error(err: PackageError, config: &PackageConfig) -> anyhow::Error {
    match err {
        PackageError::SourceNotFound { path } => anyhow!(
            "Plugin folder not found: {}\n\
             HINT: Run from the directory containing '{}' or pass --source-root.",
            path.display(),
            config.plugin_folder
        ),
        PackageError::MainFileMissing { path } => anyhow!(
            "Main plugin file not found: {}\n\
             HINT: Check --main-file; WordPress identifies the plugin by this file.",
            path.display()
        ),
        PackageError::StagedMainFileMissing { path } => anyhow!(
            "Main plugin file not found in plugin directory!\n\
             Expected: {}\n\
             HINT: The main file may match an exclusion pattern; check --exclude.",
            path.display()
        ),
        PackageError::LayoutMismatch { expected, found } => layout_error(&expected, &found),
        PackageError::ArchiveCreate { path, source } => anyhow!(
            "Cannot create archive {}: {source}\n\
             HINT: Check that --output-dir '{}' exists and is writable.",
            path.display(),
            config.output_dir.display()
        ),
        PackageError::InvalidArchive(reason) => anyhow!(
            "Invalid archive: {reason}\n\
             HINT: The archive may be corrupted or not a ZIP file."
        ),
        PackageError::Io(io_err) => anyhow!("I/O error while packaging plugin: {io_err}"),
        other => anyhow::Error::from(other).context(format!(
            "Error packaging plugin '{}'",
            config.plugin_folder
        )),
    }
}

/// Converts an error from `verify`/`list`, where no build config exists
pub fn convert_inspection_error(err: PackageError) -> anyhow::Error {
    match err {
        PackageError::LayoutMismatch { expected, found } => layout_error(&expected, &found),
        PackageError::InvalidArchive(reason) => anyhow!(
            "Invalid archive: {reason}\n\
             HINT: The archive may be corrupted or not a ZIP file."
        ),
        other => anyhow::Error::from(other),
    }
}

fn layout_error(expected: &str, found: &[String]) -> anyhow::Error {
    let mut msg = format!("Zip structure is incorrect!\nExpected: {expected}");
    if found.is_empty() {
        msg.push_str("\nThe archive is empty.");
    } else {
        msg.push_str("\nFirst files in zip:");
        for name in found {
            msg.push_str("\n  - ");
            msg.push_str(name);
        }
    }
    msg.push_str("\nHINT: WordPress will install this as a new plugin instead of updating.");
    anyhow!(msg)
}
