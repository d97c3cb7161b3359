//! Build command implementation.

use crate::cli::BuildArgs;
use crate::error::add_project_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use sdist_core::BuildOptions;
use sdist_core::SdistError;
use sdist_core::build_sdist_with_report;
use sdist_core::options::ATOMIC;
use sdist_core::options::COMPRESSION_LEVEL;
use sdist_core::options::LogLevel;
use sdist_core::options::REPRODUCIBLE;
use std::env;

const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

pub fn execute(args: &BuildArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let project = &args.project_dir;
    let epoch = add_project_context(source_date_epoch(env::var(SOURCE_DATE_EPOCH).ok()), project)?;
    let options = add_project_context(build_options(args, epoch), project)?;
    let settings = add_project_context(options.settings(), project)?;

    tracing::debug!(
        options = options.len(),
        reproducible = settings.sdist.is_reproducible(),
        atomic = settings.sdist.atomic_write,
        "resolved build options"
    );

    if epoch.is_some() && !settings.sdist.is_reproducible() {
        formatter.format_warning(
            "SOURCE_DATE_EPOCH is set but reproducible output was not requested (use --reproducible)",
        );
    }

    let report = add_project_context(
        build_sdist_with_report(project, &args.outdir, &options),
        project,
    )?;

    formatter.format_build_result(&report)
}

/// Log level requested through `-C logging.level=...`, if any.
///
/// Invalid options are ignored here and reported when the build runs.
pub fn log_level(args: &BuildArgs) -> Option<LogLevel> {
    build_options(args, None).ok()?.settings().ok()?.logging.level
}

/// Merges `-C` pairs with the dedicated flags. Flags win.
fn build_options(args: &BuildArgs, epoch: Option<u64>) -> Result<BuildOptions, SdistError> {
    let mut options = BuildOptions::new().with_source_date_epoch(epoch);
    for pair in &args.config_settings {
        options.push_pair(pair)?;
    }

    if let Some(level) = args.compression_level {
        options.insert(COMPRESSION_LEVEL, level.to_string());
    }
    if args.reproducible {
        options.insert(REPRODUCIBLE, "true");
    }
    if args.atomic {
        options.insert(ATOMIC, "true");
    }
    Ok(options)
}

fn source_date_epoch(raw: Option<String>) -> Result<Option<u64>, SdistError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e| SdistError::InvalidOption {
                key: SOURCE_DATE_EPOCH.to_string(),
                reason: format!("{value:?} is not a Unix timestamp: {e}"),
            }),
    }
}
