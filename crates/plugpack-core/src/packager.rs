//! End-to-end packaging run.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::DateTime;
use chrono::Local;
use tracing::info;
use tracing::warn;

use crate::PackageConfig;
use crate::PackageError;
use crate::ProgressCallback;
use crate::Result;
use crate::archive::write_archive;
use crate::filters::ExclusionRules;
use crate::inspection::verify_layout;
use crate::report::PackageReport;
use crate::report::PackageWarning;
use crate::staging::StagingArea;
use crate::staging::copy_tree;
use crate::validate::validate_source;

/// Timestamp format appended to archive names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Builds a plugin archive from a source folder.
///
/// A run validates the source, copies non-excluded files into a temporary
/// staging tree rooted at the plugin folder, writes a deflate ZIP, removes
/// the staging tree and re-reads the archive to confirm the entry file is at
/// `plugin_folder/main_file`.
///
/// # Examples
///
/// ```no_run
/// use plugpack_core::NoopProgress;
/// use plugpack_core::PackageConfig;
/// use plugpack_core::Packager;
///
/// let config = PackageConfig::default()
///     .with_plugin_folder("acme")
///     .with_main_file("acme.php")
///     .with_plugin_name("Acme Gateway");
///
/// let report = Packager::new(config).run(&mut NoopProgress)?;
/// println!("{}: {} files", report.archive_name(), report.archive_entries);
/// # Ok::<(), plugpack_core::PackageError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Packager {
    config: PackageConfig,
    rules: ExclusionRules,
}

impl Packager {
    /// Creates a packager for the given configuration.
    #[must_use]
    pub fn new(config: PackageConfig) -> Self {
        let rules = ExclusionRules::new(config.exclude_patterns.iter().cloned());
        Self { config, rules }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PackageConfig {
        &self.config
    }

    /// Returns the exclusion rules built from the configuration.
    #[must_use]
    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    /// Returns the archive file name for a given time:
    /// `<plugin_folder>-<YYYYmmdd-HHMMSS>.zip`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::TimeZone;
    /// use plugpack_core::PackageConfig;
    /// use plugpack_core::Packager;
    ///
    /// let packager = Packager::new(PackageConfig::default().with_plugin_folder("acme"));
    /// let at = chrono::Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
    /// assert_eq!(packager.archive_name(&at), "acme-20240309-070501.zip");
    /// ```
    #[must_use]
    pub fn archive_name(&self, at: &DateTime<Local>) -> String {
        format!(
            "{}-{}.zip",
            self.config.plugin_folder,
            at.format(TIMESTAMP_FORMAT)
        )
    }

    /// Runs the packager, naming the archive after the current local time.
    ///
    /// # Errors
    ///
    /// See [`run_at`](Self::run_at).
    pub fn run(&self, progress: &mut dyn ProgressCallback) -> Result<PackageReport> {
        self.run_at(&Local::now(), progress)
    }

    /// Runs the packager, naming the archive after `at`.
    ///
    /// An existing archive with the same name is overwritten.
    ///
    /// # Errors
    ///
    /// Fatal conditions:
    /// - [`PackageError::InvalidCompressionLevel`] / [`PackageError::InvalidConfig`]
    /// - [`PackageError::SourceNotFound`]: plugin folder missing
    /// - [`PackageError::MainFileMissing`]: entry file missing from source
    /// - [`PackageError::StagedMainFileMissing`]: entry file excluded or not
    ///   copied
    /// - [`PackageError::LayoutMismatch`]: archive lacks the expected entry
    /// - [`PackageError::ArchiveCreate`]: output file cannot be created
    /// - I/O or ZIP errors while writing or reading the archive
    ///
    /// Header mismatch, a missing dependency stub and per-file copy errors
    /// are recorded as warnings in the returned report.
    pub fn run_at(
        &self,
        at: &DateTime<Local>,
        progress: &mut dyn ProgressCallback,
    ) -> Result<PackageReport> {
        let start = Instant::now();
        let config = &self.config;
        config.validate()?;

        let mut report = PackageReport {
            plugin_folder: config.plugin_folder.clone(),
            main_file: config.main_file.clone(),
            plugin_name: config.plugin_name.clone(),
            ..PackageReport::default()
        };

        info!(
            folder = %config.plugin_folder,
            main_file = %config.main_file,
            plugin_name = %config.plugin_name,
            "building plugin archive"
        );

        let check = validate_source(config)?;
        report.header_verified = check.header_verified;
        if check.header_verified {
            info!("plugin name header verified");
        } else {
            let expected = config.header_marker();
            warn!(%expected, "plugin name header might not match");
            report.add_warning(PackageWarning::HeaderMismatch { expected });
        }

        let output = self.output_path(at);
        let staging = StagingArea::create(config.staging_parent.as_deref(), &config.plugin_folder)?;

        info!("creating plugin folder structure");
        let copied = copy_tree(
            &config.plugin_source_dir(),
            staging.plugin_dir(),
            &self.rules,
            progress,
        )?;
        report.files_copied = copied.files_copied;
        report.entries_excluded = copied.entries_excluded;
        report.warnings.extend(copied.warnings);
        info!(
            files = copied.files_copied,
            excluded = copied.entries_excluded,
            "copied plugin files"
        );

        let staged_main = staging.plugin_dir().join(&config.main_file);
        if !staged_main.is_file() {
            return Err(PackageError::StagedMainFileMissing { path: staged_main });
        }

        report.dependencies_found = match &config.dependency_stub {
            Some(stub) if !staging.plugin_dir().join(stub).is_file() => {
                warn!(stub = %stub.display(), "dependency stub not found");
                report.add_warning(PackageWarning::DependencyStubMissing { stub: stub.clone() });
                false
            }
            Some(_) => {
                info!("vendor dependencies found");
                true
            }
            None => false,
        };

        info!(archive = %output.display(), "creating zip archive");
        let stats = write_archive(
            &output,
            staging.root(),
            staging.plugin_dir(),
            config.compression_level,
            progress,
        )?;
        report.bytes_written = stats.bytes_written;
        staging.close()?;

        let expected = config.expected_entry();
        let manifest = verify_layout(&output, &expected)?;
        info!(%expected, "archive structure verified");

        report.archive_entries = manifest.total_entries;
        report.archive_size = fs::metadata(&output)?.len();
        report.archive_path = output;
        report.duration = start.elapsed();

        info!(
            archive = %report.archive_path.display(),
            files = report.archive_entries,
            size = report.archive_size,
            "plugin archive created"
        );

        Ok(report)
    }

    fn output_path(&self, at: &DateTime<Local>) -> PathBuf {
        self.config.output_dir.join(self.archive_name(at))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::NoopProgress;
    use chrono::TimeZone;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        source: TempDir,
        output: TempDir,
        staging: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let fixture = Self {
                source: TempDir::new().unwrap(),
                output: TempDir::new().unwrap(),
                staging: TempDir::new().unwrap(),
            };
            fixture.write("acme/acme.php", "<?php\n/*\n * Plugin Name: Acme Gateway\n */\n");
            fixture.write("acme/vendor/autoload.php", "<?php // autoload");
            fixture
        }

        fn write(&self, rel: &str, contents: &str) {
            let path = self.source.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        fn config(&self) -> PackageConfig {
            PackageConfig::default()
                .with_source_root(self.source.path())
                .with_plugin_folder("acme")
                .with_main_file("acme.php")
                .with_plugin_name("Acme Gateway")
                .with_output_dir(self.output.path())
                .with_staging_parent(Some(self.staging.path().to_path_buf()))
        }

        fn staging_is_empty(&self) -> bool {
            fs::read_dir(self.staging.path()).unwrap().next().is_none()
        }

        fn output_is_empty(&self) -> bool {
            fs::read_dir(self.output.path()).unwrap().next().is_none()
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_run_produces_verified_archive() {
        let fixture = Fixture::new();
        fixture.write("acme/includes/class-acme.php", "<?php class Acme {}");

        let report = Packager::new(fixture.config())
            .run_at(&fixed_time(), &mut NoopProgress)
            .unwrap();

        assert_eq!(
            report.archive_path,
            fixture.output.path().join("acme-20240102-030405.zip")
        );
        assert!(report.archive_path.is_file());
        assert!(report.header_verified);
        assert!(report.dependencies_found);
        assert_eq!(report.files_copied, 3);
        assert_eq!(report.archive_entries, 3);
        assert!(report.archive_size > 0);
        assert!(!report.has_warnings());
        assert!(fixture.staging_is_empty());
    }

    #[test]
    fn test_missing_source_folder_is_fatal_and_clean() {
        let fixture = Fixture::new();
        let config = fixture.config().with_plugin_folder("missing");

        let result = Packager::new(config).run_at(&fixed_time(), &mut NoopProgress);

        assert!(matches!(result, Err(PackageError::SourceNotFound { .. })));
        assert!(fixture.output_is_empty());
        assert!(fixture.staging_is_empty());
    }

    #[test]
    fn test_missing_main_file_is_fatal() {
        let fixture = Fixture::new();
        let config = fixture.config().with_main_file("nope.php");

        let result = Packager::new(config).run_at(&fixed_time(), &mut NoopProgress);

        assert!(matches!(result, Err(PackageError::MainFileMissing { .. })));
        assert!(fixture.output_is_empty());
        assert!(fixture.staging_is_empty());
    }

    #[test]
    fn test_excluded_main_file_is_fatal_and_clean() {
        let fixture = Fixture::new();
        let config = fixture
            .config()
            .with_additional_excludes(["acme.php"]);

        let result = Packager::new(config).run_at(&fixed_time(), &mut NoopProgress);

        match result {
            Err(PackageError::StagedMainFileMissing { path }) => {
                assert!(path.ends_with(Path::new("acme").join("acme.php")));
            }
            other => panic!("expected StagedMainFileMissing, got {other:?}"),
        }
        assert!(fixture.output_is_empty());
        assert!(fixture.staging_is_empty());
    }

    #[test]
    fn test_header_mismatch_is_a_warning() {
        let fixture = Fixture::new();
        fixture.write("acme/acme.php", "<?php // no header here");

        let report = Packager::new(fixture.config())
            .run_at(&fixed_time(), &mut NoopProgress)
            .unwrap();

        assert!(!report.header_verified);
        assert_eq!(
            report.warnings,
            vec![PackageWarning::HeaderMismatch {
                expected: "Plugin Name: Acme Gateway".to_string()
            }]
        );
        assert!(report.archive_path.is_file());
    }

    #[test]
    fn test_missing_dependency_stub_is_a_warning() {
        let fixture = Fixture::new();
        fs::remove_dir_all(fixture.source.path().join("acme/vendor")).unwrap();

        let report = Packager::new(fixture.config())
            .run_at(&fixed_time(), &mut NoopProgress)
            .unwrap();

        assert!(!report.dependencies_found);
        assert!(matches!(
            report.warnings.as_slice(),
            [PackageWarning::DependencyStubMissing { .. }]
        ));
        assert_eq!(report.archive_entries, 1);
    }

    #[test]
    fn test_dependency_check_disabled() {
        let fixture = Fixture::new();
        fs::remove_dir_all(fixture.source.path().join("acme/vendor")).unwrap();
        let config = fixture.config().with_dependency_stub(None);

        let report = Packager::new(config)
            .run_at(&fixed_time(), &mut NoopProgress)
            .unwrap();

        assert!(!report.has_warnings());
    }

    #[test]
    fn test_invalid_config_rejected_before_touching_disk() {
        let fixture = Fixture::new();
        let config = fixture.config().with_compression_level(0);

        let result = Packager::new(config).run_at(&fixed_time(), &mut NoopProgress);

        assert!(matches!(
            result,
            Err(PackageError::InvalidCompressionLevel { level: 0 })
        ));
        assert!(fixture.output_is_empty());
        assert!(fixture.staging_is_empty());
    }

    #[test]
    fn test_unusable_names_rejected_before_touching_disk() {
        let fixture = Fixture::new();
        for config in [
            fixture.config().with_plugin_folder("acme/"),
            fixture.config().with_main_file("./acme.php"),
        ] {
            let result = Packager::new(config).run_at(&fixed_time(), &mut NoopProgress);
            assert!(matches!(result, Err(PackageError::InvalidConfig { .. })));
        }
        assert!(fixture.output_is_empty());
        assert!(fixture.staging_is_empty());
    }

    #[test]
    fn test_missing_output_dir_names_the_archive_path() {
        let fixture = Fixture::new();
        let missing = fixture.output.path().join("dist");
        let config = fixture.config().with_output_dir(&missing);

        let result = Packager::new(config).run_at(&fixed_time(), &mut NoopProgress);

        match result {
            Err(PackageError::ArchiveCreate { path, .. }) => {
                assert_eq!(path, missing.join("acme-20240102-030405.zip"));
            }
            other => panic!("expected ArchiveCreate, got {other:?}"),
        }
        assert!(fixture.staging_is_empty());
    }

    #[test]
    fn test_archive_name_format() {
        let packager = Packager::new(PackageConfig::default());
        assert_eq!(
            packager.archive_name(&fixed_time()),
            "checkout-com-unified-payments-api-20240102-030405.zip"
        );
    }
}
