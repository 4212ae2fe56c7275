//! Archive layout verification and source audit.

use std::fmt;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::PackageError;
use crate::Result;
use crate::filters::ExclusionRules;
use crate::inspection::list::list_archive;
use crate::inspection::manifest::ArchiveManifest;

/// Number of entries shown when the expected entry is missing.
const MISMATCH_PREVIEW: usize = 5;

/// Confirms that `expected` is one of the archive's entry names.
///
/// Returns the archive manifest on success so callers can report counts
/// without reading the archive again.
///
/// # Errors
///
/// - [`PackageError::LayoutMismatch`] if the entry is absent, carrying the
///   first five entries found
/// - [`PackageError::Io`] or [`PackageError::InvalidArchive`] if the
///   archive cannot be read
///
/// # Examples
///
/// ```no_run
/// use plugpack_core::inspection::verify_layout;
///
/// let manifest = verify_layout("acme-20240101-120000.zip", "acme/acme.php")?;
/// println!("{} files", manifest.total_entries);
/// # Ok::<(), plugpack_core::PackageError>(())
/// ```
pub fn verify_layout<P: AsRef<Path>>(archive_path: P, expected: &str) -> Result<ArchiveManifest> {
    let manifest = list_archive(archive_path)?;
    if manifest.contains(expected) {
        debug!(expected, "archive layout verified");
        Ok(manifest)
    } else {
        Err(PackageError::LayoutMismatch {
            expected: expected.to_string(),
            found: manifest.first_names(MISMATCH_PREVIEW),
        })
    }
}

/// A single invariant violation found by [`audit_archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditIssue {
    /// Entry does not live under the plugin folder.
    OutsidePluginFolder {
        /// Entry name.
        entry: String,
    },

    /// Entry name matches an exclusion rule.
    Excluded {
        /// Entry name.
        entry: String,
        /// The rule it matched.
        rule: String,
    },

    /// No corresponding file exists in the source tree.
    MissingInSource {
        /// Entry name.
        entry: String,
    },

    /// Entry contents differ from the source file.
    ContentMismatch {
        /// Entry name.
        entry: String,
    },
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsidePluginFolder { entry } => {
                write!(f, "{entry}: not under the plugin folder")
            }
            Self::Excluded { entry, rule } => {
                write!(f, "{entry}: matches exclusion rule '{rule}'")
            }
            Self::MissingInSource { entry } => write!(f, "{entry}: not found in source tree"),
            Self::ContentMismatch { entry } => {
                write!(f, "{entry}: contents differ from source file")
            }
        }
    }
}

/// Result of auditing an archive against its source tree.
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    /// File entries checked.
    pub entries_checked: usize,

    /// Violations found, in archive order.
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    /// Returns `true` when no violations were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Audits every file entry of an archive against the plugin source folder.
///
/// Each entry must be named `plugin_folder/<relative>`, must not match any
/// exclusion rule, and must have the same bytes as `source_dir/<relative>`.
/// Directory entries are ignored.
///
/// # Errors
///
/// Returns an error only if the archive itself cannot be read. Violations
/// are reported in [`AuditReport::issues`].
pub fn audit_archive<P: AsRef<Path>>(
    archive_path: P,
    source_dir: &Path,
    plugin_folder: &str,
    rules: &ExclusionRules,
) -> Result<AuditReport> {
    let file = File::open(archive_path.as_ref())?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| PackageError::InvalidArchive(format!("failed to open ZIP archive: {e}")))?;

    let prefix = format!("{plugin_folder}/");
    let mut report = AuditReport::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        report.entries_checked += 1;
        let name = entry.name().to_string();

        let Some(relative) = name.strip_prefix(&prefix) else {
            report
                .issues
                .push(AuditIssue::OutsidePluginFolder { entry: name });
            continue;
        };

        if let Some(rule) = rules.matching_rule(relative) {
            report.issues.push(AuditIssue::Excluded {
                entry: name.clone(),
                rule: rule.to_string(),
            });
            continue;
        }

        let source_path: PathBuf = source_dir.join(relative);
        if !source_path.is_file() {
            report.issues.push(AuditIssue::MissingInSource { entry: name });
            continue;
        }

        let mut archived = Vec::new();
        entry.read_to_end(&mut archived)?;
        if fs::read(&source_path)? != archived {
            report.issues.push(AuditIssue::ContentMismatch { entry: name });
        }
    }

    Ok(report)
}
