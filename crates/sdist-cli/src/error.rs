//! Error conversion utilities for CLI.
//!
//! Turns sdist-core's typed errors into anyhow errors that tell the user
//! what to change.

use anyhow::anyhow;
use sdist_core::SdistError;
use sdist_core::exclusion::IGNORE_FILE;
use std::path::Path;

/// Converts `SdistError` to an anyhow error with a hint for the project at
/// `project`.
pub fn convert_sdist_error(err: SdistError, project: &Path) -> anyhow::Error {
    match err {
        SdistError::Configuration { reason } => anyhow!(
            "Cannot read project metadata in '{}': {reason}\n\
             HINT: pyproject.toml needs a [project] table with a static name and version.",
            project.display()
        ),
        SdistError::Toml(source) => anyhow!(
            "Malformed pyproject.toml in '{}': {source}",
            project.display()
        ),
        SdistError::InvalidIdentity { reason } => anyhow!(
            "Project name or version cannot be used in a file name: {reason}\n\
             HINT: Names and versions must not contain path separators or be empty."
        ),
        SdistError::InvalidPattern {
            line,
            pattern,
            source,
        } => anyhow!(
            "Invalid exclusion pattern {pattern:?} (rule {line}): {source}\n\
             HINT: Fix or remove the line in {}/{IGNORE_FILE}.",
            project.display()
        ),
        SdistError::OutputDirectory { path, source } => anyhow!(
            "Cannot create output directory '{}': {source}\n\
             HINT: Choose another location with --outdir.",
            path.display()
        ),
        SdistError::FileAccess { path, source } => anyhow!(
            "Cannot read '{}' while archiving: {source}\n\
             HINT: The file may have been removed or modified during the build. \
             Exclude it in {IGNORE_FILE} or retry.",
            path.display()
        ),
        SdistError::InvalidOption { key, reason } => anyhow!(
            "Invalid build option {key}: {reason}\n\
             HINT: Options are passed as -C KEY=VALUE."
        ),
        SdistError::InvalidCompressionLevel { level } => anyhow!(
            "Invalid compression level {level}\n\
             HINT: Use a level between 1 (fastest) and 9 (smallest)."
        ),
        SdistError::InvalidArchive(reason) => anyhow!(
            "Invalid archive: {reason}\n\
             HINT: The file may be corrupted or not a gzip-compressed tar."
        ),
        _ => anyhow::Error::from(err)
            .context(format!("Error processing project '{}'", project.display())),
    }
}

/// Adds project context to a core result.
pub fn add_project_context<T>(
    result: Result<T, SdistError>,
    project: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_sdist_error(e, project))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_configuration_error() {
        let err = SdistError::Configuration {
            reason: "missing version".into(),
        };
        let msg = format!("{:?}", convert_sdist_error(err, Path::new("proj")));
        assert!(msg.contains("missing version"));
        assert!(msg.contains("proj"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_file_access_error() {
        let err = SdistError::FileAccess {
            path: PathBuf::from("proj/src/gone.py"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let msg = format!("{:?}", convert_sdist_error(err, Path::new("proj")));
        assert!(msg.contains("gone.py"));
        assert!(msg.contains(".gitignore"));
    }

    #[test]
    fn test_convert_compression_level_error() {
        let err = SdistError::InvalidCompressionLevel { level: 12 };
        let msg = format!("{:?}", convert_sdist_error(err, Path::new(".")));
        assert!(msg.contains("12"));
        assert!(msg.contains("between 1"));
    }

    #[test]
    fn test_convert_io_error_keeps_context() {
        let err = SdistError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let msg = format!("{:?}", convert_sdist_error(err, Path::new("proj")));
        assert!(msg.contains("Error processing project 'proj'"));
        assert!(msg.contains("denied"));
    }
}
