//! Verify command implementation

use crate::cli::VerifyArgs;
use crate::error::convert_inspection_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use plugpack_core::ExclusionRules;
use plugpack_core::audit_archive;
use plugpack_core::config::DEFAULT_EXCLUDE_PATTERNS;
use plugpack_core::verify_layout;

pub fn execute(args: &VerifyArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let expected = format!("{}/{}", args.plugin.folder, args.plugin.main_file);

    let manifest = verify_layout(&args.archive, &expected).map_err(convert_inspection_error)?;

    let audit = match &args.source {
        Some(source) => {
            let rules = ExclusionRules::new(
                DEFAULT_EXCLUDE_PATTERNS
                    .iter()
                    .copied()
                    .chain(args.exclude.iter().map(String::as_str)),
            );
            let report = audit_archive(&args.archive, source, &args.plugin.folder, &rules)
                .map_err(convert_inspection_error)?;
            Some(report)
        }
        None => None,
    };

    formatter.format_verification(&args.archive, &expected, &manifest, audit.as_ref())?;

    if let Some(report) = audit.filter(|r| !r.is_clean()) {
        formatter.format_warning("Archive contents differ from the plugin source");
        bail!("Archive audit found {} issue(s)", report.issues.len());
    }

    Ok(())
}
