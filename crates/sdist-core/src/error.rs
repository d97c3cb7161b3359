//! Error types for source distribution builds.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `SdistError`.
pub type Result<T> = std::result::Result<T, SdistError>;

/// Errors that can occur while resolving, selecting, or archiving a project.
#[derive(Error, Debug)]
pub enum SdistError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Project metadata could not be resolved.
    #[error("invalid project configuration: {reason}")]
    Configuration {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// `pyproject.toml` is not valid TOML or has unexpected field types.
    #[error("failed to parse pyproject.toml: {0}")]
    Toml(#[from] toml::de::Error),

    /// Project name or version cannot be used as a path component.
    #[error("invalid project identity: {reason}")]
    InvalidIdentity {
        /// Why the identity was rejected.
        reason: String,
    },

    /// An exclusion pattern could not be compiled.
    #[error("invalid exclude pattern on line {line}: {pattern:?}: {source}")]
    InvalidPattern {
        /// 1-based position in the combined pattern list.
        line: usize,
        /// The offending pattern text.
        pattern: String,
        /// Underlying glob compilation error.
        #[source]
        source: globset::Error,
    },

    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDirectory {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file found during the walk could not be read.
    ///
    /// Usually the file was removed or had its permissions changed between
    /// listing and opening.
    #[error("cannot read {path}: {source}")]
    FileAccess {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("directory walk failed: {0}")]
    Walk(String),

    /// A build option has an unusable value.
    #[error("invalid build option {key}: {reason}")]
    InvalidOption {
        /// Option key as given by the caller.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}: must be between 1 and 9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// A built archive could not be read back.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),
}

impl SdistError {
    /// Returns `true` if the error was raised before any archive I/O began.
    ///
    /// Such failures leave no file behind in the output directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use sdist_core::SdistError;
    ///
    /// let err = SdistError::Configuration {
    ///     reason: "missing [project] table".into(),
    /// };
    /// assert!(err.is_configuration_error());
    ///
    /// let err = SdistError::Walk("loop detected".into());
    /// assert!(!err.is_configuration_error());
    /// ```
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::Toml(_)
                | Self::InvalidIdentity { .. }
                | Self::InvalidPattern { .. }
                | Self::InvalidOption { .. }
                | Self::InvalidCompressionLevel { .. }
        )
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use sdist_core::SdistError;
    ///
    /// let err = SdistError::InvalidArchive("truncated gzip stream".into());
    /// assert_eq!(err.context(), Some("truncated gzip stream"));
    ///
    /// let err = SdistError::InvalidCompressionLevel { level: 0 };
    /// assert_eq!(err.context(), None);
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Configuration { reason }
            | Self::InvalidIdentity { reason }
            | Self::InvalidOption { reason, .. } => Some(reason),
            Self::InvalidArchive(msg) | Self::Walk(msg) => Some(msg),
            _ => None,
        }
    }

    /// Returns the path involved in the failure, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::OutputDirectory { path, .. } | Self::FileAccess { path, .. } => Some(path),
            _ => None,
        }
    }
}
