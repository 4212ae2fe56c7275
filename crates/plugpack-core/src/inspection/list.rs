//! Archive listing implementation.

use std::fs::File;
use std::path::Path;

use crate::PackageError;
use crate::Result;
use crate::inspection::manifest::ArchiveEntry;
use crate::inspection::manifest::ArchiveManifest;

/// Lists archive contents without extracting.
///
/// # Errors
///
/// Returns error if:
/// - Archive file cannot be opened
/// - Archive is not a readable ZIP file
///
/// # Examples
///
/// ```no_run
/// use plugpack_core::inspection::list_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let manifest = list_archive("acme-20240101-120000.zip")?;
/// for entry in &manifest.entries {
///     println!("{}: {} bytes", entry.name, entry.size);
/// }
/// # Ok(())
/// # }
/// ```
pub fn list_archive<P: AsRef<Path>>(archive_path: P) -> Result<ArchiveManifest> {
    let file = File::open(archive_path.as_ref())?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| PackageError::InvalidArchive(format!("failed to open ZIP archive: {e}")))?;

    let mut manifest = ArchiveManifest::default();
    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| PackageError::InvalidArchive(format!("failed to read ZIP entry: {e}")))?;

        manifest.push(ArchiveEntry {
            name: entry.name().to_string(),
            size: entry.size(),
            compressed_size: entry.compressed_size(),
            mode: entry.unix_mode(),
            is_dir: entry.is_dir(),
        });
    }

    Ok(manifest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default().unix_permissions(0o644);
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_list_archive_entries_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.zip");
        write_zip(
            &path,
            &[("acme/b.php", b"bb"), ("acme/a.php", b"a"), ("acme/c.php", b"ccc")],
        );

        let manifest = list_archive(&path).unwrap();
        assert_eq!(manifest.total_entries, 3);
        assert_eq!(manifest.total_size, 6);
        assert_eq!(
            manifest.first_names(2),
            vec!["acme/b.php".to_string(), "acme/a.php".to_string()]
        );
        assert_eq!(manifest.entries[0].mode.map(|m| m & 0o777), Some(0o644));
        assert!(!manifest.entries[0].is_dir);
    }

    #[test]
    fn test_list_missing_archive() {
        let temp = TempDir::new().unwrap();
        let result = list_archive(temp.path().join("missing.zip"));
        assert!(matches!(result, Err(PackageError::Io(_))));
    }

    #[test]
    fn test_list_not_a_zip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fake.zip");
        std::fs::write(&path, "this is not a zip file").unwrap();
        let result = list_archive(&path);
        assert!(matches!(result, Err(PackageError::InvalidArchive(_))));
    }
}
