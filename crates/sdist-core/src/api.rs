//! High-level entry points.

use crate::BuildOptions;
use crate::Result;
use crate::SdistBuilder;
use crate::SdistReport;
use crate::exclusion::ExclusionSpec;
use crate::pyproject::load_project;
use std::path::Path;

/// Builds a source distribution and returns its file name.
///
/// This is the PEP 517 `build_sdist` operation with the project root made
/// explicit: nothing here reads the process working directory or
/// environment.
///
/// Metadata and exclusion rules are resolved before the output directory is
/// touched, so configuration errors leave no trace on disk.
///
/// # Arguments
///
/// * `project_root` - Directory containing `pyproject.toml`
/// * `output_directory` - Where the archive is written; created if absent
/// * `options` - The frontend's `config_settings`
///
/// # Errors
///
/// Returns an error if:
/// - A recognized build option has an invalid value
/// - `pyproject.toml` is missing or lacks a usable name and version
/// - The ignore file cannot be read or has a malformed pattern
/// - The output directory cannot be created
/// - A project file cannot be read while archiving
///
/// # Examples
///
/// ```no_run
/// use sdist_core::BuildOptions;
/// use sdist_core::build_sdist;
///
/// let name = build_sdist(".", "dist", &BuildOptions::new())?;
/// assert!(name.ends_with(".tar.gz"));
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
pub fn build_sdist<P: AsRef<Path>, Q: AsRef<Path>>(
    project_root: P,
    output_directory: Q,
    options: &BuildOptions,
) -> Result<String> {
    build_sdist_with_report(project_root, output_directory, options).map(|r| r.file_name)
}

/// Like [`build_sdist`], but returns the full build report.
///
/// # Errors
///
/// Same as [`build_sdist`].
pub fn build_sdist_with_report<P: AsRef<Path>, Q: AsRef<Path>>(
    project_root: P,
    output_directory: Q,
    options: &BuildOptions,
) -> Result<SdistReport> {
    let root = project_root.as_ref();
    let settings = options.settings()?;

    let project = load_project(root)?;
    let matcher = ExclusionSpec::for_project(root)?.compile()?;

    SdistBuilder::new(
        root,
        output_directory,
        project.identity,
        project.document,
        matcher,
    )
    .config(settings.sdist)
    .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::SdistError;
    use tempfile::TempDir;

    #[test]
    fn test_missing_pyproject_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("dist");
        let err = build_sdist(temp.path(), &out, &BuildOptions::new()).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(!out.exists());
    }

    #[test]
    fn test_bad_option_fails_first() {
        let temp = TempDir::new().unwrap();
        let options = BuildOptions::new().with("sdist.atomic", "perhaps");
        let err = build_sdist(temp.path(), temp.path().join("dist"), &options).unwrap_err();
        assert!(matches!(err, SdistError::InvalidOption { .. }));
    }

    #[test]
    fn test_malformed_ignore_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("pyproject.toml"),
            "[project]\nname = \"demo\"\nversion = \"1.0\"\n",
        )
        .unwrap();
        std::fs::write(temp.path().join(".gitignore"), "[oops\n").unwrap();
        let out = temp.path().join("dist");

        let err = build_sdist(temp.path(), &out, &BuildOptions::new()).unwrap_err();
        assert!(matches!(err, SdistError::InvalidPattern { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_returns_file_name_only() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("pyproject.toml"),
            "[project]\nname = \"demo\"\nversion = \"1.2.3\"\n",
        )
        .unwrap();
        let name = build_sdist(temp.path(), temp.path().join("out"), &BuildOptions::new()).unwrap();
        assert_eq!(name, "demo-1.2.3.tar.gz");
    }
}
