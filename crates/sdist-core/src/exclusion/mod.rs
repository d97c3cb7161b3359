//! File selection for source distributions.
//!
//! An [`ExclusionSpec`] is the ordered list of gitignore-syntax lines that
//! decides which project files stay out of the archive: a fixed baseline
//! followed by the project's own `.gitignore`. Compiling it yields an
//! [`ExclusionMatcher`] that answers include/exclude for any relative path.

mod matcher;
mod pattern;

pub use matcher::ExclusionMatcher;
pub use pattern::IgnorePattern;

use crate::Result;
use crate::SdistError;
use std::path::Path;

/// Patterns that are always excluded, in evaluation order.
///
/// Version control, tox and nox environments, egg-info metadata, and Python
/// interpreter caches.
pub const BASELINE_PATTERNS: [&str; 6] = [
    ".git/",
    ".tox/",
    ".nox/",
    "*.egg-info/",
    "__pycache__/",
    "__pypackages__/",
];

/// Name of the project ignore file read from the project root.
pub const IGNORE_FILE: &str = ".gitignore";

/// Ordered gitignore pattern lines.
///
/// # Examples
///
/// ```
/// use sdist_core::exclusion::ExclusionSpec;
/// use std::path::Path;
///
/// let mut spec = ExclusionSpec::baseline();
/// spec.extend(["*.log"]);
///
/// let matcher = spec.compile()?;
/// assert!(matcher.matches(Path::new(".git/config")));
/// assert!(matcher.matches(Path::new("a/b/x.log")));
/// assert!(!matcher.matches(Path::new("a/b/x.txt")));
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSpec {
    lines: Vec<String>,
    /// Leading lines that later negations cannot override.
    protected: usize,
}

impl ExclusionSpec {
    /// Spec containing only [`BASELINE_PATTERNS`].
    ///
    /// Baseline exclusions are protected: nothing appended afterwards can
    /// re-include a path they exclude.
    #[must_use]
    pub fn baseline() -> Self {
        Self {
            lines: BASELINE_PATTERNS.iter().map(ToString::to_string).collect(),
            protected: BASELINE_PATTERNS.len(),
        }
    }

    /// Spec containing exactly the given lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            protected: 0,
        }
    }

    /// Baseline plus the project's ignore file, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the ignore file exists but cannot be read.
    pub fn for_project(root: &Path) -> Result<Self> {
        let mut spec = Self::baseline();
        if let Some(text) = read_ignore_file(root)? {
            spec.extend(text.lines());
        }
        Ok(spec)
    }

    /// Appends lines after the existing ones.
    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    /// The raw lines in evaluation order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Compiles the lines into a matcher.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::InvalidPattern` if any line is not a valid glob.
    pub fn compile(&self) -> Result<ExclusionMatcher> {
        let (protected, rest) = self.lines.split_at(self.protected);
        ExclusionMatcher::from_layers(protected, rest)
    }
}

/// Reads `<root>/.gitignore`.
///
/// Returns `Ok(None)` when the file does not exist; that simply means there
/// are no project-specific patterns.
///
/// # Errors
///
/// Returns `SdistError::FileAccess` if the file exists but cannot be read
/// or is not valid UTF-8.
pub fn read_ignore_file(root: &Path) -> Result<Option<String>> {
    let path = root.join(IGNORE_FILE);
    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no ignore file");
            Ok(None)
        }
        Err(source) => Err(SdistError::FileAccess { path, source }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_baseline_order() {
        let spec = ExclusionSpec::baseline();
        assert_eq!(spec.lines(), BASELINE_PATTERNS);
    }

    #[test]
    fn test_baseline_excludes_tooling_dirs() {
        let matcher = ExclusionSpec::baseline().compile().unwrap();
        for path in [
            ".git/config",
            ".git/objects/ab/cdef",
            ".tox/py311/bin/python",
            ".nox/tests/log.txt",
            "demo.egg-info/PKG-INFO",
            "src/demo.egg-info/SOURCES.txt",
            "src/demo/__pycache__/mod.cpython-311.pyc",
            "__pypackages__/3.11/lib/x.py",
        ] {
            assert!(matcher.matches(Path::new(path)), "{path} should be excluded");
        }
        assert!(!matcher.matches(Path::new("src/demo/__init__.py")));
        assert!(!matcher.matches(Path::new(".gitignore")));
        assert!(!matcher.matches(Path::new(".github/workflows/ci.yml")));
    }

    #[test]
    fn test_read_ignore_file_absent() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_ignore_file(temp.path()).unwrap(), None);
    }

    #[test]
    fn test_read_ignore_file_present() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(IGNORE_FILE), "*.pyc\nbuild/\n").unwrap();
        assert_eq!(
            read_ignore_file(temp.path()).unwrap().as_deref(),
            Some("*.pyc\nbuild/\n")
        );
    }

    #[test]
    fn test_read_ignore_file_not_utf8() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(IGNORE_FILE), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            read_ignore_file(temp.path()),
            Err(SdistError::FileAccess { .. })
        ));
    }

    #[test]
    fn test_for_project_appends_after_baseline() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(IGNORE_FILE), "*.log\n!.git/keep\n").unwrap();

        let spec = ExclusionSpec::for_project(temp.path()).unwrap();
        assert_eq!(spec.lines().len(), BASELINE_PATTERNS.len() + 2);
        assert_eq!(spec.lines()[BASELINE_PATTERNS.len()], "*.log");

        let matcher = spec.compile().unwrap();
        assert!(matcher.matches(Path::new("a/b/x.log")));
        assert!(!matcher.matches(Path::new("a/b/x.txt")));
        // Baseline directories stay excluded whatever the ignore file says.
        assert!(matcher.matches(Path::new(".git/keep")));
        assert!(matcher.matches(Path::new(".git/HEAD")));
    }

    #[test]
    fn test_custom_negation_overrides_custom_exclusion() {
        let mut spec = ExclusionSpec::baseline();
        spec.extend(["build/", "!build/keep.txt"]);
        let matcher = spec.compile().unwrap();
        assert!(matcher.matches(Path::new("build/tmp.o")));
        assert!(!matcher.matches(Path::new("build/keep.txt")));
    }

    #[test]
    fn test_from_lines_has_no_protected_layer() {
        let spec = ExclusionSpec::from_lines([".git/", "!.git/keep"]);
        let matcher = spec.compile().unwrap();
        assert!(!matcher.matches(Path::new(".git/keep")));
        assert!(matcher.matches(Path::new(".git/HEAD")));
    }

    #[test]
    fn test_for_project_without_ignore_file() {
        let temp = TempDir::new().unwrap();
        let spec = ExclusionSpec::for_project(temp.path()).unwrap();
        assert_eq!(spec, ExclusionSpec::baseline());
    }

    #[test]
    fn test_malformed_ignore_line_fails_compile() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(IGNORE_FILE), "ok.txt\nbad[\n").unwrap();

        let spec = ExclusionSpec::for_project(temp.path()).unwrap();
        let err = spec.compile().unwrap_err();
        match err {
            SdistError::InvalidPattern { line, .. } => {
                assert_eq!(line, BASELINE_PATTERNS.len() + 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
