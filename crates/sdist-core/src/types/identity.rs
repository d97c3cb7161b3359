//! Project name and version, validated for use in file names.

use crate::Result;
use crate::SdistError;
use std::fmt;

/// Suffix of every archive produced by this crate.
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// A resolved `{name, version}` pair.
///
/// Both parts end up in a file name (`<name>-<version>.tar.gz`) and in the
/// archive's root directory (`<name>-<version>/`), so construction rejects
/// anything that would escape a single path component.
///
/// # Examples
///
/// ```
/// use sdist_core::ProjectIdentity;
///
/// let id = ProjectIdentity::new("demo", "1.2.3")?;
/// assert_eq!(id.root_dir(), "demo-1.2.3");
/// assert_eq!(id.archive_name(), "demo-1.2.3.tar.gz");
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectIdentity {
    name: String,
    version: String,
}

impl ProjectIdentity {
    /// Creates a new identity after checking both parts are path-safe.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::InvalidIdentity` if either part is empty, is `.`
    /// or `..`, or contains a path separator, a NUL byte, or a control
    /// character.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let version = version.into();
        validate_part("name", &name)?;
        validate_part("version", &version)?;
        Ok(Self { name, version })
    }

    /// Project name as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project version as declared.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the directory every archive entry lives under.
    #[must_use]
    pub fn root_dir(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// File name of the archive, without any directory.
    #[must_use]
    pub fn archive_name(&self) -> String {
        format!("{}{ARCHIVE_EXTENSION}", self.root_dir())
    }
}

impl fmt::Display for ProjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

fn validate_part(field: &str, value: &str) -> Result<()> {
    let reason = if value.trim().is_empty() {
        Some(format!("{field} is empty"))
    } else if value == "." || value == ".." {
        Some(format!("{field} {value:?} is a relative path component"))
    } else if value.contains(['/', '\\']) {
        Some(format!("{field} {value:?} contains a path separator"))
    } else if value.chars().any(char::is_control) {
        Some(format!("{field} {value:?} contains a control character"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SdistError::InvalidIdentity { reason }),
        None => Ok(()),
    }
}
