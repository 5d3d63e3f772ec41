//! Fluent construction. Every setter feeds the same [`LoggerConfig`] that [`Logger::new`]
//! validates, so the builder can't produce a logger the config path would reject.

use super::Logger;
use crate::config::{LoggerConfig, NoOutputPolicy};
use crate::error::Error;
use crate::level::Level;
use crate::output::ConsoleTarget;
use std::io::Write;

#[derive(Debug, Default)]
pub struct LoggerBuilder {
    config: LoggerConfig,
    console: ConsoleTarget,
}

impl LoggerBuilder {
    /// Starts from [`LoggerConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration record.
    #[must_use]
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            console: ConsoleTarget::default(),
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.config.format = format.into();
        self
    }

    #[must_use]
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.config.timestamp_format = format.into();
        self
    }

    #[must_use]
    pub const fn log_to_console(mut self, enabled: bool) -> Self {
        self.config.log_to_console = enabled;
        self
    }

    #[must_use]
    pub const fn log_to_file(mut self, enabled: bool) -> Self {
        self.config.log_to_file = enabled;
        self
    }

    /// Bytes before the active file rotates; 0 disables rotation.
    #[must_use]
    pub const fn max_bytes(mut self, bytes: u64) -> Self {
        self.config.max_bytes = bytes;
        self
    }

    #[must_use]
    pub const fn backup_count(mut self, count: u64) -> Self {
        self.config.backup_count = count;
        self
    }

    #[must_use]
    pub const fn colored(mut self, enabled: bool) -> Self {
        self.config.colored = enabled;
        self
    }

    #[must_use]
    pub const fn no_output_policy(mut self, policy: NoOutputPolicy) -> Self {
        self.config.no_output_policy = policy;
        self
    }

    /// Sends console records somewhere other than stderr.
    #[must_use]
    pub fn console_target(mut self, target: ConsoleTarget) -> Self {
        self.console = target;
        self
    }

    /// Shorthand for a [`ConsoleTarget::writer`] (treated as a non-terminal).
    #[must_use]
    pub fn console_writer(self, writer: impl Write + Send + 'static) -> Self {
        self.console_target(ConsoleTarget::writer(writer))
    }

    /// # Errors
    /// As [`Logger::new`].
    pub fn build(self) -> Result<Logger, Error> {
        Logger::with_console(self.config, self.console)
    }
}
