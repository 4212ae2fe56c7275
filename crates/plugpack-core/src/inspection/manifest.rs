//! Archive manifest types.

/// A single entry of a ZIP archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name as stored (always `/`-separated).
    pub name: String,

    /// Uncompressed size in bytes.
    pub size: u64,

    /// Compressed size in bytes.
    pub compressed_size: u64,

    /// Unix permission bits, if recorded.
    pub mode: Option<u32>,

    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Listing of an archive's entries in stored order.
///
/// # Examples
///
/// ```
/// use plugpack_core::inspection::ArchiveEntry;
/// use plugpack_core::inspection::ArchiveManifest;
///
/// let mut manifest = ArchiveManifest::default();
/// manifest.push(ArchiveEntry {
///     name: "acme/acme.php".to_string(),
///     size: 10,
///     compressed_size: 8,
///     mode: Some(0o644),
///     is_dir: false,
/// });
///
/// assert!(manifest.contains("acme/acme.php"));
/// assert_eq!(manifest.total_size, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveManifest {
    /// Entries in the order they appear in the archive.
    pub entries: Vec<ArchiveEntry>,

    /// Number of entries.
    pub total_entries: usize,

    /// Sum of uncompressed sizes.
    pub total_size: u64,
}

impl ArchiveManifest {
    /// Appends an entry and updates totals.
    pub fn push(&mut self, entry: ArchiveEntry) {
        self.total_entries += 1;
        self.total_size = self.total_size.saturating_add(entry.size);
        self.entries.push(entry);
    }

    /// Returns whether an entry with exactly this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Returns the names of the first `n` entries.
    #[must_use]
    pub fn first_names(&self, n: usize) -> Vec<String> {
        self.entries.iter().take(n).map(|e| e.name.clone()).collect()
    }
}
