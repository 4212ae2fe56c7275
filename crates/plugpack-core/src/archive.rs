//! ZIP archive creation from the staging tree.

use crate::PackageError;
use crate::ProgressCallback;
use crate::Result;
use crate::filters::to_slash_lossy;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Statistics of a written archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Files written into the archive.
    pub files_added: usize,

    /// Uncompressed bytes written.
    pub bytes_written: u64,
}

/// Writes every file under `plugin_dir` into a deflate ZIP at `output`.
///
/// Entry names are relative to `staging_root` (the parent of `plugin_dir`),
/// so all entries start with the plugin folder name. Only files are stored;
/// directories are implied by entry names. Files are added in file-name
/// order, and no timestamps are taken from the clock, so two archives of the
/// same tree have identical entries.
///
/// # Errors
///
/// Returns [`PackageError::ArchiveCreate`] if the output file cannot be
/// created, and another error if a staged file cannot be
/// read, or the ZIP backend fails.
///
/// # Examples
///
/// ```no_run
/// use plugpack_core::NoopProgress;
/// use plugpack_core::archive::write_archive;
/// use std::path::Path;
///
/// let stats = write_archive(
///     Path::new("acme.zip"),
///     Path::new("/tmp/stage"),
///     Path::new("/tmp/stage/acme"),
///     6,
///     &mut NoopProgress,
/// )?;
/// println!("{} files", stats.files_added);
/// # Ok::<(), plugpack_core::PackageError>(())
/// ```
pub fn write_archive(
    output: &Path,
    staging_root: &Path,
    plugin_dir: &Path,
    compression_level: u8,
    progress: &mut dyn ProgressCallback,
) -> Result<ArchiveStats> {
    let file = File::create(output).map_err(|source| PackageError::ArchiveCreate {
        path: output.to_path_buf(),
        source,
    })?;
    write_archive_to(file, staging_root, plugin_dir, compression_level, progress)
}

fn write_archive_to<W: Write + Seek>(
    writer: W,
    staging_root: &Path,
    plugin_dir: &Path,
    compression_level: u8,
    progress: &mut dyn ProgressCallback,
) -> Result<ArchiveStats> {
    let files = staged_files(staging_root, plugin_dir)?;
    let total = files.len();

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(compression_level)));

    let mut stats = ArchiveStats::default();
    let mut buffer = vec![0u8; 64 * 1024];

    for (idx, (path, archive_path)) in files.iter().enumerate() {
        progress.on_entry_start(archive_path, total, idx + 1);

        let mut file = File::open(path)?;
        let file_options = with_permissions(options, &file.metadata()?);
        let name = to_slash_lossy(archive_path);
        zip.start_file(name.as_str(), file_options)?;

        let mut bytes = 0u64;
        loop {
            let read = file.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            zip.write_all(&buffer[..read])?;
            bytes += read as u64;
        }

        debug!(entry = %name, bytes, "added to archive");
        stats.files_added += 1;
        stats.bytes_written += bytes;
        progress.on_bytes_written(bytes);
        progress.on_entry_complete(archive_path);
    }

    zip.finish()?;
    progress.on_complete();
    Ok(stats)
}

/// Lists files under `plugin_dir` as `(path, archive_path)` pairs in
/// file-name order.
fn staged_files(staging_root: &Path, plugin_dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(plugin_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let archive_path = entry
            .path()
            .strip_prefix(staging_root)
            .map_err(|_| {
                std::io::Error::other(format!(
                    "{} is not under staging root {}",
                    entry.path().display(),
                    staging_root.display()
                ))
            })?
            .to_path_buf();
        files.push((entry.path().to_path_buf(), archive_path));
    }
    Ok(files)
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, metadata: &std::fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _metadata: &std::fs::Metadata) -> SimpleFileOptions {
    options
}
