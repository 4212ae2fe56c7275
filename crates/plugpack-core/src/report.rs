//! Packaging reports, warnings and progress callbacks.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// A non-fatal problem encountered during a packaging run.
///
/// Warnings never change control flow; the run still produces and verifies
/// an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageWarning {
    /// The entry file does not contain the expected `Plugin Name:` header.
    HeaderMismatch {
        /// The header line that was searched for.
        expected: String,
    },

    /// The dependency loader stub is missing from the staged plugin.
    DependencyStubMissing {
        /// Stub path relative to the plugin folder.
        stub: PathBuf,
    },

    /// A single file could not be copied into the staging tree.
    CopyFailed {
        /// Source file that failed.
        path: PathBuf,
        /// Underlying error message.
        reason: String,
    },
}

impl fmt::Display for PackageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderMismatch { expected } => {
                write!(f, "plugin header might not match (expected '{expected}')")
            }
            Self::DependencyStubMissing { stub } => write!(
                f,
                "{} not found; the plugin requires vendor dependencies (run 'composer install')",
                stub.display()
            ),
            Self::CopyFailed { path, reason } => {
                write!(f, "could not copy {}: {reason}", path.display())
            }
        }
    }
}

/// Report of a successful packaging run.
///
/// # Examples
///
/// ```
/// use plugpack_core::PackageReport;
///
/// let mut report = PackageReport::default();
/// report.archive_size = 3 * 1024 * 1024 / 2;
/// assert!((report.archive_size_mb() - 1.5).abs() < f64::EPSILON);
/// assert!(!report.has_warnings());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageReport {
    /// Path of the written archive.
    pub archive_path: PathBuf,

    /// Plugin folder name (top-level directory inside the archive).
    pub plugin_folder: String,

    /// Entry file name.
    pub main_file: String,

    /// Plugin name header value.
    pub plugin_name: String,

    /// Whether the entry file carried the expected header.
    pub header_verified: bool,

    /// Whether the dependency stub was found in the staged tree.
    pub dependencies_found: bool,

    /// Files copied into the staging tree.
    pub files_copied: usize,

    /// Files and directories left out by exclusion rules.
    pub entries_excluded: usize,

    /// Entries found in the archive during verification.
    pub archive_entries: usize,

    /// Uncompressed bytes written into the archive.
    pub bytes_written: u64,

    /// Size of the archive on disk.
    pub archive_size: u64,

    /// Duration of the run.
    pub duration: Duration,

    /// Non-fatal problems, in the order they occurred.
    pub warnings: Vec<PackageWarning>,
}

impl PackageReport {
    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: PackageWarning) {
        self.warnings.push(warning);
    }

    /// Returns whether any warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the archive file name without directories.
    #[must_use]
    pub fn archive_name(&self) -> String {
        self.archive_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Returns the archive size in mebibytes.
    #[must_use]
    pub fn archive_size_mb(&self) -> f64 {
        self.archive_size as f64 / 1024.0 / 1024.0
    }

    /// Returns the number of per-file copy failures.
    #[must_use]
    pub fn copy_failures(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, PackageWarning::CopyFailed { .. }))
            .count()
    }
}

/// Callback trait for progress reporting during copy and archive phases.
///
/// Implementors receive notifications as each file is processed, allowing
/// progress bars or logging.
pub trait ProgressCallback {
    /// Called when starting to process a file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the file, relative to the plugin folder
    /// * `total` - Total number of files in this phase
    /// * `current` - Current file number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called after file content has been written.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when a file has been completely processed.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called when the phase is complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback` that does nothing.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
