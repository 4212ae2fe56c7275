//! Source folder validation.

use crate::PackageConfig;
use crate::PackageError;
use crate::Result;
use std::fs;

/// Outcome of source validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCheck {
    /// Whether the entry file contains the `Plugin Name:` header.
    pub header_verified: bool,
}

/// Validates that the plugin source folder and its entry file exist.
///
/// The header marker is searched for in the entry file's contents; a missing
/// marker is not an error and is reported through
/// [`SourceCheck::header_verified`]. Contents are decoded lossily so that
/// stray non-UTF-8 bytes never fail validation.
///
/// # Errors
///
/// - [`PackageError::SourceNotFound`] if the plugin folder is missing
/// - [`PackageError::MainFileMissing`] if the entry file is missing
/// - [`PackageError::Io`] if the entry file cannot be read
///
/// # Examples
///
/// ```no_run
/// use plugpack_core::PackageConfig;
/// use plugpack_core::validate::validate_source;
///
/// let config = PackageConfig::default().with_source_root("release");
/// let check = validate_source(&config)?;
/// if !check.header_verified {
///     eprintln!("plugin header might not match");
/// }
/// # Ok::<(), plugpack_core::PackageError>(())
/// ```
pub fn validate_source(config: &PackageConfig) -> Result<SourceCheck> {
    let source_dir = config.plugin_source_dir();
    if !source_dir.is_dir() {
        return Err(PackageError::SourceNotFound { path: source_dir });
    }

    let main_file = config.main_file_path();
    if !main_file.is_file() {
        return Err(PackageError::MainFileMissing { path: main_file });
    }

    let bytes = fs::read(&main_file)?;
    let contents = String::from_utf8_lossy(&bytes);
    let header_verified = contents.contains(&config.header_marker());

    Ok(SourceCheck { header_verified })
}
