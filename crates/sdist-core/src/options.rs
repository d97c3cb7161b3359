//! Build options passed by the frontend.
//!
//! PEP 517 frontends hand the backend a free-form `config_settings` mapping.
//! [`BuildOptions`] stores it as given; [`BuildOptions::settings`] picks out
//! the keys this crate understands and validates them. Unknown keys are
//! left alone so other tools can share the same mapping.

use crate::Result;
use crate::SdistError;
use crate::creation::SdistConfig;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Key selecting the log level.
pub const LOGGING_LEVEL: &str = "logging.level";
/// Key selecting the gzip level (1-9).
pub const COMPRESSION_LEVEL: &str = "sdist.compression-level";
/// Key enabling normalized timestamps and ownership.
pub const REPRODUCIBLE: &str = "sdist.reproducible";
/// Key enabling write-to-temp-then-rename.
pub const ATOMIC: &str = "sdist.atomic";

/// Timestamp used for reproducible builds when the caller supplies none
/// (1980-01-01T00:00:00Z).
pub const DEFAULT_SOURCE_DATE_EPOCH: u64 = 315_532_800;

/// A single `config_settings` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Plain string value.
    Single(String),
    /// Repeated key (`-C key=a -C key=b`).
    List(Vec<String>),
}

impl OptionValue {
    /// The effective scalar: the value itself, or the last list element.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::List(values) => values.last().map(String::as_str),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// The frontend's `config_settings` plus values the host environment
/// supplies at the binding boundary.
///
/// # Examples
///
/// ```
/// use sdist_core::BuildOptions;
/// use sdist_core::options::LogLevel;
///
/// let options = BuildOptions::new()
///     .with("logging.level", "debug")
///     .with("sdist.compression-level", "9")
///     .with("tool.other", "ignored");
///
/// let settings = options.settings()?;
/// assert_eq!(settings.logging.level, Some(LogLevel::Debug));
/// assert_eq!(settings.sdist.compression_level, Some(9));
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    values: BTreeMap<String, OptionValue>,
    source_date_epoch: Option<u64>,
}

impl BuildOptions {
    /// Empty options: every setting at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets the timestamp used when reproducible output is requested.
    ///
    /// Callers usually take this from `SOURCE_DATE_EPOCH`.
    #[must_use]
    pub fn with_source_date_epoch(mut self, epoch: Option<u64>) -> Self {
        self.source_date_epoch = epoch;
        self
    }

    /// Adds or replaces one key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Parses a `key=value` pair as given on a command line and adds it.
    ///
    /// Repeating a key turns its value into a list.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::InvalidOption` if there is no `=` or the key is
    /// empty.
    pub fn push_pair(&mut self, pair: &str) -> Result<()> {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(SdistError::InvalidOption {
                key: pair.to_string(),
                reason: "expected KEY=VALUE".to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(SdistError::InvalidOption {
                key: pair.to_string(),
                reason: "empty key".to_string(),
            });
        }

        let value = value.to_string();
        match self.values.remove(key) {
            None => {
                self.values.insert(key.to_string(), OptionValue::Single(value));
            }
            Some(OptionValue::Single(first)) => {
                self.values
                    .insert(key.to_string(), OptionValue::List(vec![first, value]));
            }
            Some(OptionValue::List(mut values)) => {
                values.push(value);
                self.values.insert(key.to_string(), OptionValue::List(values));
            }
        }
        Ok(())
    }

    /// Looks up a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Number of keys, recognized or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no keys were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolves the recognized keys into typed settings.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::InvalidOption` if a recognized key has a value
    /// that cannot be parsed, or `SdistError::InvalidCompressionLevel` if
    /// the level is out of range.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(raw) = self.scalar(LOGGING_LEVEL)? {
            settings.logging.level = Some(raw.parse().map_err(|reason| SdistError::InvalidOption {
                key: LOGGING_LEVEL.to_string(),
                reason,
            })?);
        }

        if let Some(raw) = self.scalar(COMPRESSION_LEVEL)? {
            let level = raw.trim().parse::<u8>().map_err(|e| SdistError::InvalidOption {
                key: COMPRESSION_LEVEL.to_string(),
                reason: format!("{raw:?} is not an integer: {e}"),
            })?;
            settings.sdist.compression_level = Some(level);
        }

        if let Some(raw) = self.scalar(REPRODUCIBLE)?
            && parse_bool(REPRODUCIBLE, raw)?
        {
            settings.sdist.source_date_epoch =
                Some(self.source_date_epoch.unwrap_or(DEFAULT_SOURCE_DATE_EPOCH));
        }

        if let Some(raw) = self.scalar(ATOMIC)? {
            settings.sdist.atomic_write = parse_bool(ATOMIC, raw)?;
        }

        settings.sdist.validate()?;
        Ok(settings)
    }

    fn scalar(&self, key: &str) -> Result<Option<&str>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => value.last().map(Some).ok_or_else(|| SdistError::InvalidOption {
                key: key.to_string(),
                reason: "empty list".to_string(),
            }),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for BuildOptions
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SdistError::InvalidOption {
            key: key.to_string(),
            reason: format!("{raw:?} is not a boolean"),
        }),
    }
}

/// Verbosity requested through build options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Per-entry detail.
    Debug,
    /// Build start and finish.
    Info,
    /// Skipped entries and other oddities.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing` filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Accepts `tracing` names and Python `logging` names, any case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "notset" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "critical" => Ok(Self::Error),
            other => Err(format!("unknown log level {other:?}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Requested level; `None` leaves the host default in place.
    pub level: Option<LogLevel>,
}

/// Everything [`BuildOptions`] resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Archive settings.
    pub sdist: SdistConfig,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_give_defaults() {
        let settings = BuildOptions::new().settings().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.logging.level, None);
        assert!(!settings.sdist.atomic_write);
        assert_eq!(settings.sdist.source_date_epoch, None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options = BuildOptions::new()
            .with("cmake.build-type", "Release")
            .with("wheel.py-api", "cp38");
        assert_eq!(options.len(), 2);
        assert!(options.settings().is_ok());
    }

    #[test]
    fn test_log_level_names() {
        for (raw, level) in [
            ("DEBUG", LogLevel::Debug),
            ("Warning", LogLevel::Warn),
            ("warn", LogLevel::Warn),
            ("CRITICAL", LogLevel::Error),
            ("info", LogLevel::Info),
        ] {
            let settings = BuildOptions::new()
                .with(LOGGING_LEVEL, raw)
                .settings()
                .unwrap();
            assert_eq!(settings.logging.level, Some(level), "{raw}");
        }
    }

    #[test]
    fn test_bad_log_level() {
        let err = BuildOptions::new()
            .with(LOGGING_LEVEL, "loud")
            .settings()
            .unwrap_err();
        assert!(matches!(err, SdistError::InvalidOption { ref key, .. } if key == LOGGING_LEVEL));
    }

    #[test]
    fn test_compression_level() {
        let settings = BuildOptions::new()
            .with(COMPRESSION_LEVEL, "3")
            .settings()
            .unwrap();
        assert_eq!(settings.sdist.compression_level, Some(3));

        let err = BuildOptions::new()
            .with(COMPRESSION_LEVEL, "fast")
            .settings()
            .unwrap_err();
        assert!(matches!(err, SdistError::InvalidOption { .. }));

        let err = BuildOptions::new()
            .with(COMPRESSION_LEVEL, "12")
            .settings()
            .unwrap_err();
        assert!(matches!(err, SdistError::InvalidCompressionLevel { level: 12 }));
    }

    #[test]
    fn test_reproducible_uses_supplied_epoch() {
        let settings = BuildOptions::new()
            .with(REPRODUCIBLE, "true")
            .with_source_date_epoch(Some(1_700_000_000))
            .settings()
            .unwrap();
        assert_eq!(settings.sdist.source_date_epoch, Some(1_700_000_000));

        let settings = BuildOptions::new()
            .with(REPRODUCIBLE, "yes")
            .settings()
            .unwrap();
        assert_eq!(
            settings.sdist.source_date_epoch,
            Some(DEFAULT_SOURCE_DATE_EPOCH)
        );
    }

    #[test]
    fn test_epoch_alone_does_not_enable_reproducible() {
        let settings = BuildOptions::new()
            .with_source_date_epoch(Some(1_700_000_000))
            .settings()
            .unwrap();
        assert_eq!(settings.sdist.source_date_epoch, None);
    }

    #[test]
    fn test_atomic_flag() {
        let settings = BuildOptions::new().with(ATOMIC, "on").settings().unwrap();
        assert!(settings.sdist.atomic_write);

        let err = BuildOptions::new()
            .with(ATOMIC, "maybe")
            .settings()
            .unwrap_err();
        assert!(matches!(err, SdistError::InvalidOption { .. }));
    }

    #[test]
    fn test_push_pair_repeats_become_list() {
        let mut options = BuildOptions::new();
        options.push_pair("logging.level=info").unwrap();
        options.push_pair("logging.level=debug").unwrap();
        options.push_pair("x=a=b").unwrap();

        assert_eq!(
            options.get(LOGGING_LEVEL),
            Some(&OptionValue::List(vec!["info".into(), "debug".into()]))
        );
        assert_eq!(options.get("x"), Some(&OptionValue::Single("a=b".into())));
        // The last value wins.
        assert_eq!(
            options.settings().unwrap().logging.level,
            Some(LogLevel::Debug)
        );
    }

    #[test]
    fn test_push_pair_rejects_malformed() {
        let mut options = BuildOptions::new();
        assert!(options.push_pair("novalue").is_err());
        assert!(options.push_pair("=value").is_err());
        assert!(options.is_empty());
    }

    #[test]
    fn test_empty_list_is_invalid() {
        let options = BuildOptions::new().with(ATOMIC, Vec::<String>::new());
        assert!(matches!(
            options.settings(),
            Err(SdistError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_from_iterator() {
        let options: BuildOptions = [(ATOMIC, "1"), (COMPRESSION_LEVEL, "9")]
            .into_iter()
            .collect();
        let settings = options.settings().unwrap();
        assert!(settings.sdist.atomic_write);
        assert_eq!(settings.sdist.compression_level, Some(9));
    }
}
