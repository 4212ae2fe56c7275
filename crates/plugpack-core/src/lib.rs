//! WordPress plugin packaging library.
//!
//! `plugpack-core` turns a plugin source folder into a ZIP archive that
//! WordPress recognizes as an update of the installed plugin: every entry is
//! rooted at the plugin folder name, development artifacts are left out by
//! substring exclusion rules, and the finished archive is re-read to confirm
//! the main plugin file sits at `<folder>/<main file>`.
//!
//! # Examples
//!
//! ```no_run
//! use plugpack_core::NoopProgress;
//! use plugpack_core::PackageConfig;
//! use plugpack_core::Packager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PackageConfig::default().with_source_root("release");
//! let report = Packager::new(config).run(&mut NoopProgress)?;
//! println!(
//!     "Created {} ({} files, {:.2} MB)",
//!     report.archive_name(),
//!     report.archive_entries,
//!     report.archive_size_mb()
//! );
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod config;
pub mod error;
pub mod filters;
pub mod inspection;
pub mod packager;
pub mod report;
pub mod staging;
pub mod validate;

pub use config::PackageConfig;
pub use error::PackageError;
pub use error::Result;
pub use filters::ExclusionRules;
pub use inspection::ArchiveManifest;
pub use inspection::AuditReport;
pub use inspection::audit_archive;
pub use inspection::list_archive;
pub use inspection::verify_layout;
pub use packager::Packager;
pub use report::NoopProgress;
pub use report::PackageReport;
pub use report::PackageWarning;
pub use report::ProgressCallback;
