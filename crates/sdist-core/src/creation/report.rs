//! Sdist build reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of a completed sdist build.
///
/// # Examples
///
/// ```
/// use sdist_core::SdistReport;
///
/// let mut report = SdistReport::default();
/// report.bytes_written = 1000;
/// report.bytes_compressed = 250;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// assert_eq!(report.compression_percentage(), 75.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SdistReport {
    /// File name of the archive (no directory).
    pub file_name: String,

    /// Full path of the archive.
    pub path: PathBuf,

    /// Regular files taken from the project tree.
    pub files_added: usize,

    /// Symlinks stored as links.
    pub symlinks_added: usize,

    /// Files the exclusion rules left out.
    pub files_excluded: usize,

    /// Uncompressed bytes of file contents, `PKG-INFO` included.
    pub bytes_written: u64,

    /// Size of the finished archive.
    pub bytes_compressed: u64,

    /// Wall time of the build.
    pub duration: Duration,
}

impl SdistReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compression ratio (uncompressed / compressed).
    ///
    /// Returns 0.0 if either size is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }

    /// Returns the space saved, as a percentage of the uncompressed size.
    ///
    /// Returns 0.0 when nothing was written or the archive grew.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_written == 0 {
            return 0.0;
        }
        let saved = self.bytes_written.saturating_sub(self.bytes_compressed);
        (saved as f64 / self.bytes_written as f64) * 100.0
    }

    /// Number of archive entries, `PKG-INFO` included.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.symlinks_added + 1
    }
}
