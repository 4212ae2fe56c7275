//! Error types for plugin packaging operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackageError`.
pub type Result<T> = std::result::Result<T, PackageError>;

/// Fatal errors that abort a packaging run.
///
/// Soft failures (header mismatch, missing dependency stub, per-file copy
/// errors) are never represented here; they are collected as
/// [`PackageWarning`](crate::PackageWarning)s in the report instead.
#[derive(Error, Debug)]
pub enum PackageError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The plugin source folder does not exist.
    #[error("plugin folder not found: {path}")]
    SourceNotFound {
        /// The folder that was expected.
        path: PathBuf,
    },

    /// The entry file is missing from the source folder.
    #[error("main plugin file not found: {path}")]
    MainFileMissing {
        /// The expected entry file path.
        path: PathBuf,
    },

    /// The entry file did not make it into the staging tree.
    #[error("main plugin file not found in staged plugin directory: {path}")]
    StagedMainFileMissing {
        /// The expected path inside the staging tree.
        path: PathBuf,
    },

    /// The produced archive does not contain the expected entry path.
    #[error("archive structure is incorrect: expected entry '{expected}'")]
    LayoutMismatch {
        /// The entry that should have been present.
        expected: String,
        /// The first few entries actually found in the archive.
        found: Vec<String>,
    },

    /// The output archive file could not be created.
    #[error("cannot create archive {path}: {source}")]
    ArchiveCreate {
        /// The archive path that was being created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The archive could not be read or written by the ZIP backend.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Compression level outside the supported range.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Configuration value is unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },
}

impl PackageError {
    /// Returns `true` if the error was caused by the input plugin tree rather
    /// than by the environment (I/O, archive backend) or configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugpack_core::PackageError;
    /// use std::path::PathBuf;
    ///
    /// let err = PackageError::SourceNotFound {
    ///     path: PathBuf::from("my-plugin"),
    /// };
    /// assert!(err.is_source_error());
    ///
    /// let err = PackageError::InvalidCompressionLevel { level: 0 };
    /// assert!(!err.is_source_error());
    /// ```
    #[must_use]
    pub const fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. }
                | Self::MainFileMissing { .. }
                | Self::StagedMainFileMissing { .. }
        )
    }
}

impl From<zip::result::ZipError> for PackageError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io_err) => Self::Io(io_err),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for PackageError {
    fn from(err: walkdir::Error) -> Self {
        let msg = err.to_string();
        err.into_io_error()
            .map_or_else(|| Self::Io(std::io::Error::other(msg)), Self::Io)
    }
}
