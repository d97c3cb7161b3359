//! List command implementation

use crate::cli::ListArgs;
use crate::error::convert_sdist_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use sdist_core::inspection::list_sdist;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let entries = list_sdist(&args.archive).map_err(|e| {
        convert_sdist_error(e, &args.archive)
            .context(format!("failed to list '{}'", args.archive.display()))
    })?;

    formatter.format_listing(&entries, args.long)
}
