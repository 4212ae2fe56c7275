//! Temporary staging tree and filtered copy.
//!
//! The staging tree mirrors the archive layout: a temporary root holding a
//! single directory named after the plugin folder. It is removed when the
//! [`StagingArea`] is dropped, so every exit path (including early errors)
//! cleans it up.

use crate::ProgressCallback;
use crate::Result;
use crate::filters::ExclusionRules;
use crate::report::PackageWarning;
use std::fs;
use std::fs::File;
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::debug;
use tracing::warn;
use walkdir::WalkDir;

/// Temporary directory holding the plugin folder to be archived.
///
/// # Examples
///
/// ```
/// use plugpack_core::staging::StagingArea;
///
/// let staging = StagingArea::create(None, "my-plugin")?;
/// assert!(staging.plugin_dir().ends_with("my-plugin"));
/// assert!(staging.plugin_dir().is_dir());
///
/// let root = staging.root().to_path_buf();
/// drop(staging);
/// assert!(!root.exists());
/// # Ok::<(), plugpack_core::PackageError>(())
/// ```
#[derive(Debug)]
pub struct StagingArea {
    root: TempDir,
    plugin_dir: PathBuf,
}

impl StagingArea {
    /// Creates a fresh staging root with an empty `plugin_folder` inside.
    ///
    /// The root is created under `parent`, or under the system temporary
    /// directory when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn create(parent: Option<&Path>, plugin_folder: &str) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("plugpack-");
        let root = match parent {
            Some(dir) => builder.tempdir_in(dir)?,
            None => builder.tempdir()?,
        };
        let plugin_dir = root.path().join(plugin_folder);
        fs::create_dir_all(&plugin_dir)?;
        debug!(root = %root.path().display(), "created staging directory");
        Ok(Self { root, plugin_dir })
    }

    /// Returns the staging root (the parent of the plugin folder).
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Returns the staged plugin folder.
    #[must_use]
    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    /// Removes the staging tree, reporting any removal error.
    ///
    /// Dropping the value also removes the tree but ignores errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be deleted.
    pub fn close(self) -> Result<()> {
        let path = self.root.path().to_path_buf();
        self.root.close()?;
        debug!(root = %path.display(), "removed staging directory");
        Ok(())
    }
}

/// Statistics of a filtered copy.
#[derive(Debug, Clone, Default)]
pub struct CopyReport {
    /// Files copied successfully.
    pub files_copied: usize,

    /// Bytes copied.
    pub bytes_copied: u64,

    /// Files and directories skipped by exclusion rules. An excluded
    /// directory counts once; its contents are not visited.
    pub entries_excluded: usize,

    /// Per-item failures. These never abort the copy.
    pub warnings: Vec<PackageWarning>,
}

/// Copies every non-excluded file from `source` into `dest`.
///
/// Directories whose name matches a rule are pruned without being entered.
/// Files are skipped when their name or their path relative to `source`
/// matches a rule. Relative paths are preserved, intermediate directories are
/// created on demand, and permissions and modification times are carried
/// over. Traversal is in file-name order so repeated runs stage files
/// identically.
///
/// Symlinks to files are copied as regular files; symlinks to directories
/// are not followed.
///
/// # Errors
///
/// Never fails for individual files: unreadable directories and failed
/// copies are returned as [`PackageWarning::CopyFailed`] entries.
pub fn copy_tree(
    source: &Path,
    dest: &Path,
    rules: &ExclusionRules,
    progress: &mut dyn ProgressCallback,
) -> Result<CopyReport> {
    let mut report = CopyReport::default();
    let files = collect_files(source, rules, &mut report);
    let total = files.len();

    for (idx, (src, relative)) in files.iter().enumerate() {
        progress.on_entry_start(relative, total, idx + 1);
        let dst = dest.join(relative);
        match copy_file(src, &dst) {
            Ok(bytes) => {
                report.files_copied += 1;
                report.bytes_copied += bytes;
                progress.on_bytes_written(bytes);
            }
            Err(e) => {
                warn!(path = %src.display(), error = %e, "could not copy file");
                report.warnings.push(PackageWarning::CopyFailed {
                    path: src.clone(),
                    reason: e.to_string(),
                });
            }
        }
        progress.on_entry_complete(relative);
    }

    progress.on_complete();
    Ok(report)
}

/// Walks `source` and returns `(absolute, relative)` pairs of files to copy.
fn collect_files(
    source: &Path,
    rules: &ExclusionRules,
    report: &mut CopyReport,
) -> Vec<(PathBuf, PathBuf)> {
    let mut files = Vec::new();
    let mut walker = WalkDir::new(source)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(source).to_path_buf();
                warn!(path = %path.display(), error = %e, "could not read directory entry");
                report.warnings.push(PackageWarning::CopyFailed {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let name = entry.file_name().to_string_lossy();
        let is_dir = entry.file_type().is_dir();

        if rules.is_excluded_name(&name) || rules.is_excluded_path(relative) {
            debug!(path = %relative.display(), dir = is_dir, "excluded");
            report.entries_excluded += 1;
            if is_dir {
                walker.skip_current_dir();
            }
            continue;
        }

        let is_file = entry.file_type().is_file()
            || (entry.file_type().is_symlink() && entry.path().is_file());
        if is_file {
            files.push((entry.path().to_path_buf(), relative.to_path_buf()));
        }
    }

    files
}

fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = fs::copy(src, dst)?;
    let metadata = fs::metadata(src)?;
    if let Err(e) = preserve_modified(&metadata, dst) {
        debug!(path = %dst.display(), error = %e, "could not preserve modification time");
    }
    Ok(bytes)
}

fn preserve_modified(metadata: &Metadata, dst: &Path) -> io::Result<()> {
    let modified = metadata.modified()?;
    #[cfg(unix)]
    let file = File::open(dst)?;
    #[cfg(not(unix))]
    let file = File::options().write(true).open(dst)?;
    file.set_modified(modified)
}
