//! List command implementation

use crate::cli::ListArgs;
use crate::error::convert_inspection_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use plugpack_core::list_archive;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let manifest = list_archive(&args.archive).map_err(convert_inspection_error)?;

    if args.long {
        formatter.format_manifest_long(&manifest, args.human_readable)?;
    } else {
        formatter.format_manifest_short(&manifest)?;
    }

    Ok(())
}
