//! Configuration for plugin packaging runs.

use crate::PackageError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

/// Folder name WordPress uses to identify the plugin on update.
pub const DEFAULT_PLUGIN_FOLDER: &str = "checkout-com-unified-payments-api";

/// Main plugin file carrying the plugin header.
pub const DEFAULT_MAIN_FILE: &str = "woocommerce-gateway-checkout-com.php";

/// Value of the `Plugin Name:` header expected in the main file.
pub const DEFAULT_PLUGIN_NAME: &str = "Checkout.com Payment Gateway";

/// Composer autoloader that must ship with the plugin.
pub const DEFAULT_DEPENDENCY_STUB: &str = "vendor/autoload.php";

/// Substrings that keep a file or directory out of the package.
///
/// Matching is literal and case-insensitive; `*` has no special meaning.
/// Short rules also catch unrelated names: `tests` drops `contests.php` and
/// `.md` drops `jquery.mdl.js`.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    ".git",
    ".gitignore",
    ".zip",
    ".md",
    "tests",
    ".log",
    "node_modules",
    ".DS_Store",
    "__MACOSX",
    "backups",
    "*-backup-*",
    "check-domain-association-file.php",
    "diagnose-*.php",
    "generate-*.php",
    "test-*.php",
    "terms-and-conditions-checkbox.php",
    "create-zip.py",
    "build-zip.sh",
    "build-webhook-queue-zip.sh",
    "build-plugin-zip.py",
    "build-correct-zip.sh",
    "check-zip-structure.py",
    "verify-and-fix-zip.py",
    "diagnose-header-error.py",
    "build.py",
    "php-uploads.ini",
];

/// Configuration for a packaging run.
///
/// The plugin sources are expected at `source_root/plugin_folder`, and the
/// resulting archive is rooted at a single `plugin_folder/` directory so that
/// WordPress treats it as an update of the installed plugin.
///
/// # Examples
///
/// ```
/// use plugpack_core::PackageConfig;
///
/// let config = PackageConfig::default()
///     .with_source_root("build")
///     .with_plugin_folder("my-plugin")
///     .with_main_file("my-plugin.php")
///     .with_plugin_name("My Plugin")
///     .with_compression_level(9);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.expected_entry(), "my-plugin/my-plugin.php");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageConfig {
    /// Directory containing the plugin folder.
    ///
    /// Default: `.`.
    pub source_root: PathBuf,

    /// Name of the plugin folder, both in the source root and as the
    /// top-level directory of the archive.
    pub plugin_folder: String,

    /// Entry file name, relative to the plugin folder.
    pub main_file: String,

    /// Expected `Plugin Name:` header value.
    pub plugin_name: String,

    /// Directory the archive is written to.
    ///
    /// Default: `.`.
    pub output_dir: PathBuf,

    /// Exclusion substrings, checked in order.
    pub exclude_patterns: Vec<String>,

    /// Path, relative to the plugin folder, of the dependency loader that
    /// should be present after copying. `None` disables the check.
    pub dependency_stub: Option<PathBuf>,

    /// Deflate compression level (1-9).
    ///
    /// Default: `6`.
    pub compression_level: u8,

    /// Parent directory for the temporary staging tree.
    ///
    /// `None` uses the system temporary directory.
    pub staging_parent: Option<PathBuf>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            plugin_folder: DEFAULT_PLUGIN_FOLDER.to_string(),
            main_file: DEFAULT_MAIN_FILE.to_string(),
            plugin_name: DEFAULT_PLUGIN_NAME.to_string(),
            output_dir: PathBuf::from("."),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            dependency_stub: Some(PathBuf::from(DEFAULT_DEPENDENCY_STUB)),
            compression_level: 6,
            staging_parent: None,
        }
    }
}

impl PackageConfig {
    /// Creates a new `PackageConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory containing the plugin folder.
    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    /// Sets the plugin folder name.
    #[must_use]
    pub fn with_plugin_folder(mut self, folder: impl Into<String>) -> Self {
        self.plugin_folder = folder.into();
        self
    }

    /// Sets the entry file name.
    #[must_use]
    pub fn with_main_file(mut self, file: impl Into<String>) -> Self {
        self.main_file = file.into();
        self
    }

    /// Sets the expected plugin name header value.
    #[must_use]
    pub fn with_plugin_name(mut self, name: impl Into<String>) -> Self {
        self.plugin_name = name.into();
        self
    }

    /// Sets the output directory for the archive.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replaces the exclusion patterns.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Appends exclusion patterns after the existing ones.
    #[must_use]
    pub fn with_additional_excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the dependency stub path, or disables the check with `None`.
    #[must_use]
    pub fn with_dependency_stub(mut self, stub: Option<PathBuf>) -> Self {
        self.dependency_stub = stub;
        self
    }

    /// Sets the compression level.
    ///
    /// Out-of-range values are reported by [`validate`](Self::validate).
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets the parent directory for the staging tree.
    #[must_use]
    pub fn with_staging_parent(mut self, dir: Option<PathBuf>) -> Self {
        self.staging_parent = dir;
        self
    }

    /// Returns the plugin source folder (`source_root/plugin_folder`).
    #[must_use]
    pub fn plugin_source_dir(&self) -> PathBuf {
        self.source_root.join(&self.plugin_folder)
    }

    /// Returns the entry file path inside the source folder.
    #[must_use]
    pub fn main_file_path(&self) -> PathBuf {
        self.plugin_source_dir().join(&self.main_file)
    }

    /// Returns the header line the entry file is expected to contain.
    #[must_use]
    pub fn header_marker(&self) -> String {
        format!("Plugin Name: {}", self.plugin_name)
    }

    /// Returns the archive entry that must exist after packaging.
    ///
    /// Always uses `/` as separator, as ZIP entry names do.
    #[must_use]
    pub fn expected_entry(&self) -> String {
        format!("{}/{}", self.plugin_folder, self.main_file)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is not in range 1-9
    /// - Plugin folder is not a single path segment (empty, `.`, `..`, or
    ///   containing a separator)
    /// - Main file is empty, absolute, or has an empty, `.` or `..` segment
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.compression_level) {
            return Err(PackageError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        if self.plugin_folder.contains(SEPARATORS) {
            return Err(PackageError::InvalidConfig {
                reason: format!(
                    "plugin folder must be a single directory name: {}",
                    self.plugin_folder
                ),
            });
        }
        check_relative_name("plugin folder", &self.plugin_folder)?;
        check_relative_name("main file", &self.main_file)?;
        Ok(())
    }
}

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Every segment must be a real name so that `folder/main_file` is exactly
/// the entry name the archive will contain.
fn check_relative_name(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PackageError::InvalidConfig {
            reason: format!("{what} must not be empty"),
        });
    }
    let bad_segment = value
        .split(SEPARATORS)
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad_segment || Path::new(value).is_absolute() {
        return Err(PackageError::InvalidConfig {
            reason: format!(
                "{what} must be a relative path without empty, '.' or '..' segments: {value}"
            ),
        });
    }
    Ok(())
}
