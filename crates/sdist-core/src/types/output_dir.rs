//! Output directory that is guaranteed to exist.

use crate::Result;
use crate::SdistError;
use std::path::Path;
use std::path::PathBuf;

/// A directory archives are written into.
///
/// Constructing an `OutputDir` creates the directory and all missing parents.
/// An existing directory is reused as-is.
///
/// # Examples
///
/// ```no_run
/// use sdist_core::types::OutputDir;
///
/// let out = OutputDir::create("dist")?;
/// println!("writing into {}", out.as_path().display());
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir(PathBuf);

impl OutputDir {
    /// Creates the directory (recursively) if absent.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::OutputDirectory` if the directory cannot be
    /// created, or if the path exists but is not a directory.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        std::fs::create_dir_all(path).map_err(|source| SdistError::OutputDirectory {
            path: path.to_path_buf(),
            source,
        })?;

        // create_dir_all succeeds on an existing symlink to a directory; a
        // regular file at the path makes it fail above.
        if !path.is_dir() {
            return Err(SdistError::OutputDirectory {
                path: path.to_path_buf(),
                source: std::io::Error::other("not a directory"),
            });
        }

        Ok(Self(path.to_path_buf()))
    }

    /// Returns the directory path as given.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a file name onto the directory.
    #[must_use]
    pub fn join(&self, file_name: &str) -> PathBuf {
        self.0.join(file_name)
    }
}
