//! Archive inspection without extraction.
//!
//! This module reads finished archives: listing their entries, checking that
//! the plugin entry file sits where WordPress expects it, and auditing every
//! entry against the source tree it was built from.
//!
//! # Examples
//!
//! ```no_run
//! use plugpack_core::inspection::list_archive;
//! use plugpack_core::inspection::verify_layout;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = list_archive("acme-20240101-120000.zip")?;
//! println!("Archive contains {} entries", manifest.total_entries);
//!
//! verify_layout("acme-20240101-120000.zip", "acme/acme.php")?;
//! # Ok(())
//! # }
//! ```

pub mod list;
pub mod manifest;
pub mod verify;

pub use list::list_archive;
pub use manifest::ArchiveEntry;
pub use manifest::ArchiveManifest;
pub use verify::AuditIssue;
pub use verify::AuditReport;
pub use verify::audit_archive;
pub use verify::verify_layout;
