//! Configuration validation errors.

use std::path::PathBuf;

/// A configuration field failed validation. Fatal to logger construction.
#[derive(Debug)]
pub enum ValidationError {
    /// A required key is absent from raw input.
    Missing { field: &'static str },
    /// The raw value has the wrong JSON type (e.g. `"true"` where a bool is required).
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: String,
    },
    /// A string field is empty or whitespace.
    Empty { field: &'static str },
    /// Contains a path separator or names a directory entry like `..`.
    NotAFileName { field: &'static str, value: String },
    /// Not one of DEBUG, INFO, WARNING, ERROR, CRITICAL.
    UnknownLevel { field: &'static str, value: String },
    /// An integer field is below zero.
    Negative { field: &'static str, value: i64 },
    /// The template would drop the message text.
    MissingPlaceholder {
        field: &'static str,
        placeholder: &'static str,
    },
    /// The strftime pattern contains an unsupported specifier.
    BadTimestampFormat { value: String },
    /// The log directory neither exists nor can be created by this process.
    PathNotWritable { path: PathBuf, reason: String },
    /// Both outputs are off and the policy forbids it.
    NoOutputs,
    /// Raw configuration text is not valid JSON.
    Parse(serde_json::Error),
}

impl ValidationError {
    /// Name of the offending field, where one applies.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing { field }
            | Self::WrongType { field, .. }
            | Self::Empty { field }
            | Self::NotAFileName { field, .. }
            | Self::UnknownLevel { field, .. }
            | Self::Negative { field, .. }
            | Self::MissingPlaceholder { field, .. } => Some(field),
            Self::BadTimestampFormat { .. } => Some("timestamp_format"),
            Self::PathNotWritable { .. } => Some("logger_path"),
            Self::NoOutputs | Self::Parse(_) => None,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "missing required field '{field}'"),
            Self::WrongType {
                field,
                expected,
                found,
            } => write!(f, "'{field}' must be {expected}, got {found}"),
            Self::Empty { field } => write!(f, "'{field}' cannot be empty"),
            Self::NotAFileName { field, value } => {
                write!(f, "'{field}' must be a plain file name, got '{value}'")
            }
            Self::UnknownLevel { field, value } => write!(
                f,
                "'{field}': unknown log level '{value}' (expected one of DEBUG, INFO, WARNING, ERROR, CRITICAL)"
            ),
            Self::Negative { field, value } => {
                write!(f, "'{field}' must be >= 0, got {value}")
            }
            Self::MissingPlaceholder { field, placeholder } => {
                write!(f, "'{field}' must contain the {placeholder} placeholder")
            }
            Self::BadTimestampFormat { value } => {
                write!(f, "invalid timestamp format: '{value}'")
            }
            Self::PathNotWritable { path, reason } => {
                write!(f, "log directory {} is not usable: {reason}", path.display())
            }
            Self::NoOutputs => write!(f, "both console and file logging are disabled"),
            Self::Parse(e) => write!(f, "parse error: {e}"),
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
