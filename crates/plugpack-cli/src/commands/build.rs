//! Build command implementation

use crate::cli::BuildArgs;
use crate::error::convert_package_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use plugpack_core::NoopProgress;
use plugpack_core::PackageConfig;
use plugpack_core::Packager;
use plugpack_core::ProgressCallback;
use tracing::debug;

pub fn execute(args: &BuildArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    let config = build_config(args);
    debug!(
        source = %config.plugin_source_dir().display(),
        excludes = config.exclude_patterns.len(),
        "resolved build configuration"
    );

    let packager = Packager::new(config);

    // Progress is only shown on an interactive terminal in human mode
    let mut progress: Box<dyn ProgressCallback> = if !quiet && CliProgress::should_show() {
        Box::new(CliProgress::new())
    } else {
        Box::new(NoopProgress)
    };

    let result = packager.run(progress.as_mut());
    drop(progress);

    let report = result.map_err(|e| convert_package_error(e, packager.config()))?;
    formatter.format_package_result(&report)
}

fn build_config(args: &BuildArgs) -> PackageConfig {
    let mut config = PackageConfig::new()
        .with_source_root(&args.source_root)
        .with_plugin_folder(&args.plugin.folder)
        .with_main_file(&args.plugin.main_file)
        .with_plugin_name(&args.plugin_name)
        .with_output_dir(&args.output_dir)
        .with_compression_level(args.compression_level);

    if args.no_default_excludes {
        config = config.with_exclude_patterns(Vec::new());
    }
    config = config.with_additional_excludes(&args.exclude);

    let stub = (!args.no_dependency_check).then(|| args.dependency_stub.clone());
    config.with_dependency_stub(stub)
}
