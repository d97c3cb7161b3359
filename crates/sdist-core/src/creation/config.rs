//! Configuration for sdist archive creation.

use crate::Result;
use crate::SdistError;

/// Configuration for writing an sdist archive.
///
/// The defaults write the archive in place with real file metadata and
/// flate2's default compression level.
///
/// # Examples
///
/// ```
/// use sdist_core::SdistConfig;
///
/// let config = SdistConfig::default()
///     .with_compression_level(9)
///     .with_source_date_epoch(Some(1_700_000_000))
///     .with_atomic_write(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdistConfig {
    /// Gzip level (1-9).
    ///
    /// `None` uses the codec default.
    ///
    /// Default: `None`.
    pub compression_level: Option<u8>,

    /// Upper bound for entry modification times, in seconds since the epoch.
    ///
    /// When set, every mtime is clamped to at most this value and owner
    /// ids and names are zeroed, so the same tree always produces the same
    /// bytes.
    ///
    /// Default: `None` (real file metadata).
    pub source_date_epoch: Option<u64>,

    /// Write to a temporary file in the output directory and rename it into
    /// place once complete.
    ///
    /// Default: `false` (the target file is truncated and written in place).
    pub atomic_write: bool,
}

impl SdistConfig {
    /// Creates a new `SdistConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// Out-of-range values are accepted here and rejected by
    /// [`validate`](Self::validate).
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets the timestamp clamp.
    #[must_use]
    pub fn with_source_date_epoch(mut self, epoch: Option<u64>) -> Self {
        self.source_date_epoch = epoch;
        self
    }

    /// Sets whether to write atomically.
    #[must_use]
    pub fn with_atomic_write(mut self, atomic: bool) -> Self {
        self.atomic_write = atomic;
        self
    }

    /// Returns `true` if entry metadata is normalized.
    #[must_use]
    pub const fn is_reproducible(&self) -> bool {
        self.source_date_epoch.is_some()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is set but not in range 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(SdistError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}
