//! Turns a [`LogRecord`] into one output line.

use super::format::{FormatTemplate, FormatValues};
use crate::output::LogRecord;

/// strftime pattern for `{timestamp}`; millisecond precision after a comma.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Each handler owns one; a reformat replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: FormatTemplate,
    timestamp_format: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatTemplate::default(), DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl Formatter {
    #[must_use]
    pub fn new(template: FormatTemplate, timestamp_format: impl Into<String>) -> Self {
        Self {
            template,
            timestamp_format: timestamp_format.into(),
        }
    }

    #[must_use]
    pub const fn template(&self) -> &FormatTemplate {
        &self.template
    }

    #[must_use]
    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Renders the record without a trailing newline.
    #[must_use]
    pub fn format(&self, record: &LogRecord) -> String {
        let timestamp = record.timestamp.format(&self.timestamp_format).to_string();
        let values = FormatValues {
            timestamp: &timestamp,
            level: record.level.as_str(),
            msg: &record.message,
            name: &record.logger_name,
        };
        self.template.render(&values)
    }
}
