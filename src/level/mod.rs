//! Severity levels that gate which records reach which handlers.

use std::fmt;
use std::str::FromStr;

/// Derives `Ord` so the logger can compare a record's level against each threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Diagnostics too noisy for normal operation.
    Debug = 10,
    /// Normal operational milestones.
    #[default]
    Info = 20,
    /// Non-fatal anomalies that may need attention.
    Warning = 30,
    /// Failures that prevent an operation from completing.
    Error = 40,
    /// Failures the application is unlikely to recover from.
    Critical = 50,
}

impl Level {
    /// Uppercase because that is how the level name is rendered in records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Every level, lowest first.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Debug,
            Self::Info,
            Self::Warning,
            Self::Error,
            Self::Critical,
        ]
    }

    /// Compact form stored in the logger's atomic threshold.
    #[must_use]
    pub(crate) const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Level::as_u8`]; anything unrecognised clamps to `Critical`.
    #[must_use]
    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0..=10 => Self::Debug,
            11..=20 => Self::Info,
            21..=30 => Self::Warning,
            31..=40 => Self::Error,
            _ => Self::Critical,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` so callers can distinguish "unknown level" from other parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl ParseLevelError {
    /// The rejected input, as given.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
