//! The logger's configuration record and its validation.
//!
//! Reading configuration files is left to the caller: an external loader hands over either a
//! typed [`LoggerConfig`] or the raw JSON object, and everything is checked here before a
//! single handler exists.

mod error;
pub mod validators;

pub use error::ValidationError;

use crate::fmt::DEFAULT_TIMESTAMP_FORMAT;
use crate::fmt::FormatTemplate;
use crate::level::Level;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// What construction does when neither console nor file output is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoOutputPolicy {
    /// Build a logger that writes nowhere.
    #[default]
    Allow,
    /// Fail construction with [`ValidationError::NoOutputs`].
    Reject,
    /// Turn the console on.
    Console,
}

/// Fixed at construction; only the logger's explicit setters change it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Identifies the logger and names its log file.
    pub name: String,
    /// Directory for `<name>.log` and its backups. `~` and `$VAR` are expanded.
    pub path: String,
    pub log_to_console: bool,
    pub log_to_file: bool,
    /// Minimum severity recorded at all.
    pub level: Level,
    /// Record layout, see [`FormatTemplate`].
    pub format: String,
    /// Rotation threshold in bytes; 0 never rotates.
    pub max_bytes: u64,
    /// Rotated files kept beside the active one.
    pub backup_count: u64,
    /// Console color coding by severity.
    pub colored: bool,
    pub no_output_policy: NoOutputPolicy,
    /// strftime pattern for `{timestamp}`.
    pub timestamp_format: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: "magiklog".to_string(),
            path: "logs".to_string(),
            log_to_console: true,
            log_to_file: false,
            level: Level::Info,
            format: FormatTemplate::DEFAULT.to_string(),
            max_bytes: 0,
            backup_count: 0,
            colored: true,
            no_output_policy: NoOutputPolicy::Allow,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Defaults for everything but the name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a config from the raw object an external loader produced. Missing keys take
    /// their defaults, `logger_name` is required, unknown keys are ignored.
    ///
    /// # Errors
    /// The first field that fails its validator, checked in table order.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let Some(map) = value.as_object() else {
            return Err(ValidationError::WrongType {
                field: "config",
                expected: "an object",
                found: value.to_string(),
            });
        };

        let name = map
            .get("logger_name")
            .ok_or(ValidationError::Missing {
                field: "logger_name",
            })
            .and_then(|v| validators::string("logger_name", v))?;
        let mut config = Self::new(name);

        if let Some(v) = map.get("logger_path") {
            config.path = validators::string("logger_path", v)?.to_string();
        }
        if let Some(v) = map.get("log_to_console") {
            config.log_to_console = validators::boolean("log_to_console", v)?;
        }
        if let Some(v) = map.get("log_to_file") {
            config.log_to_file = validators::boolean("log_to_file", v)?;
        }
        if let Some(v) = map.get("log_level") {
            config.level = validators::level("log_level", v)?;
        }
        if let Some(v) = map.get("log_format") {
            config.format = validators::string("log_format", v)?.to_string();
        }
        if let Some(v) = map.get("max_bytes") {
            config.max_bytes = validators::count("max_bytes", v)?;
        }
        if let Some(v) = map.get("backup_count") {
            config.backup_count = validators::count("backup_count", v)?;
        }
        if let Some(v) = map.get("colored").or_else(|| map.get("use_color")) {
            config.colored = validators::boolean("colored", v)?;
        }
        if let Some(v) = map.get("no_output_policy") {
            config.no_output_policy =
                NoOutputPolicy::deserialize(v).map_err(|_| ValidationError::WrongType {
                    field: "no_output_policy",
                    expected: "one of \"allow\", \"reject\", \"console\"",
                    found: v.to_string(),
                })?;
        }
        if let Some(v) = map.get("timestamp_format") {
            config.timestamp_format = validators::string("timestamp_format", v)?.to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// [`LoggerConfig::from_value`] for configuration already held as JSON text.
    ///
    /// # Errors
    /// [`ValidationError::Parse`] for malformed JSON, otherwise as `from_value`.
    pub fn from_json_str(text: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Checks every field of an already-typed config.
    ///
    /// # Errors
    /// The first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validators::file_name("logger_name", &self.name)?;
        validators::non_empty("logger_path", &self.path)?;
        validators::format("log_format", &self.format)?;
        validators::timestamp_format(&self.timestamp_format)?;

        if !self.log_to_console
            && !self.log_to_file
            && self.no_output_policy == NoOutputPolicy::Reject
        {
            return Err(ValidationError::NoOutputs);
        }

        if self.log_to_file {
            validators::writable_dir(&self.resolved_path())?;
        }
        Ok(())
    }

    /// `path` with `~` and environment variables expanded; unknown variables are left as written.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        let expanded = shellexpand::full(&self.path)
            .map_or_else(|_| shellexpand::tilde(&self.path), |p| p);
        PathBuf::from(expanded.as_ref())
    }

    /// `<path>/<name>.log`.
    #[must_use]
    pub fn log_file_path(&self) -> PathBuf {
        self.resolved_path().join(format!("{}.log", self.name))
    }
}
