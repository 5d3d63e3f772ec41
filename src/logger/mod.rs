//! The logger: threshold check, fan-out to handlers, and runtime reconfiguration.
//!
//! Construction validates the whole configuration before opening anything, so a `Logger`
//! either exists with every requested handler or not at all.

mod builder;

pub use builder::LoggerBuilder;

use crate::config::{LoggerConfig, NoOutputPolicy, validators};
use crate::error::{Error, UsageError};
use crate::fmt::Formatter;
use crate::handler::{Dispatch, HandlerManager, HandlerState};
use crate::internal;
use crate::level::Level;
use crate::output::{
    ConsoleSink, ConsoleTarget, FileSink, FileStats, HandlerKind, LogRecord, Sink,
};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// `Send + Sync`: share it behind an `Arc` and log from any thread.
///
/// Lock order is always `handlers` before `config`.
pub struct Logger {
    name: String,
    /// Read on every call without locking.
    threshold: AtomicU8,
    config: RwLock<LoggerConfig>,
    handlers: RwLock<HandlerManager>,
    console_target: ConsoleTarget,
}

impl Logger {
    /// Stepwise construction with a console destination other than stderr.
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Validates `config` and creates the handlers it asks for.
    ///
    /// # Errors
    /// [`Error::Validation`] for any bad field, [`Error::Handler`] if the log file can't be
    /// opened. Nothing is left open on failure.
    pub fn new(config: LoggerConfig) -> Result<Self, Error> {
        Self::with_console(config, ConsoleTarget::default())
    }

    pub(crate) fn with_console(
        mut config: LoggerConfig,
        console_target: ConsoleTarget,
    ) -> Result<Self, Error> {
        config.validate()?;

        if !config.log_to_console && !config.log_to_file {
            match config.no_output_policy {
                NoOutputPolicy::Console => {
                    internal::warning(
                        "LOGGER",
                        "No output enabled; falling back to console logging",
                    );
                    config.log_to_console = true;
                }
                NoOutputPolicy::Allow | NoOutputPolicy::Reject => {
                    internal::debug("LOGGER", &format!("Logger '{}' has no outputs", config.name));
                }
            }
        }

        let logger = Self {
            name: config.name.clone(),
            threshold: AtomicU8::new(config.level.as_u8()),
            config: RwLock::new(config),
            handlers: RwLock::new(HandlerManager::new()),
            console_target,
        };

        {
            let mut handlers = logger.handlers_mut();
            let config = logger.config();
            for kind in HandlerKind::all() {
                let wanted = match kind {
                    HandlerKind::Console => config.log_to_console,
                    HandlerKind::File => config.log_to_file,
                };
                if wanted {
                    let sink = logger.make_sink(kind, &config);
                    handlers.add(sink, config.level, Self::make_formatter(&config)?)?;
                }
            }
        }

        internal::info(
            "LOGGER",
            &format!("Logger '{}' ready at {}", logger.name, logger.level()),
        );
        Ok(logger)
    }

    fn config(&self) -> RwLockReadGuard<'_, LoggerConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn config_mut(&self) -> RwLockWriteGuard<'_, LoggerConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn handlers(&self) -> RwLockReadGuard<'_, HandlerManager> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn handlers_mut(&self) -> RwLockWriteGuard<'_, HandlerManager> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn make_sink(&self, kind: HandlerKind, config: &LoggerConfig) -> Sink {
        match kind {
            HandlerKind::Console => {
                Sink::Console(ConsoleSink::new(self.console_target.clone(), config.colored))
            }
            HandlerKind::File => Sink::File(FileSink::new(
                config.log_file_path(),
                config.max_bytes,
                config.backup_count,
            )),
        }
    }

    fn make_formatter(config: &LoggerConfig) -> Result<Formatter, Error> {
        let template = validators::format("log_format", &config.format)?;
        Ok(Formatter::new(template, config.timestamp_format.clone()))
    }

    /// Core dispatch. Records below the threshold are dropped; the rest go to every enabled
    /// handler whose own level admits them. Never panics and never returns an error: handler
    /// failures are reported to stderr and listed in the returned [`Dispatch`].
    pub fn log_message(&self, level: Level, message: &str) -> Dispatch {
        if level < self.level() {
            return Dispatch::dropped();
        }
        let record = LogRecord::new(level, self.name.as_str(), message);
        self.handlers().dispatch(&record)
    }

    pub fn debug(&self, message: &str) -> Dispatch {
        self.log_message(Level::Debug, message)
    }

    pub fn info(&self, message: &str) -> Dispatch {
        self.log_message(Level::Info, message)
    }

    pub fn warning(&self, message: &str) -> Dispatch {
        self.log_message(Level::Warning, message)
    }

    pub fn error(&self, message: &str) -> Dispatch {
        self.log_message(Level::Error, message)
    }

    pub fn critical(&self, message: &str) -> Dispatch {
        self.log_message(Level::Critical, message)
    }

    /// Parses `level` and applies it to the logger and every present handler.
    ///
    /// # Errors
    /// [`UsageError::Invalid`] for an unknown level name; nothing changes.
    pub fn set_log_level(&self, level: &str) -> Result<(), Error> {
        let level = validators::level_name("log_level", level).map_err(UsageError::Invalid)?;
        self.set_level(level);
        Ok(())
    }

    /// Typed form of [`Logger::set_log_level`].
    pub fn set_level(&self, level: Level) {
        let mut handlers = self.handlers_mut();
        handlers.set_level(level);
        self.threshold.store(level.as_u8(), Ordering::Release);
        self.config_mut().level = level;
        internal::debug("LOGGER", &format!("Level set to {level}"));
    }

    /// Narrows (or widens) a single handler without touching the logger threshold.
    ///
    /// # Errors
    /// [`UsageError::NotPresent`].
    pub fn set_handler_level(&self, kind: HandlerKind, level: Level) -> Result<(), Error> {
        self.handlers_mut().set_handler_level(kind, level)
    }

    /// Parses `format` once and hands every present handler the new formatter.
    ///
    /// # Errors
    /// [`UsageError::Invalid`] for an empty template or one without `{msg}`; nothing changes.
    pub fn set_log_format(&self, format: &str) -> Result<(), Error> {
        let template = validators::format("log_format", format).map_err(UsageError::Invalid)?;

        let mut handlers = self.handlers_mut();
        let mut config = self.config_mut();
        let formatter = Formatter::new(template, config.timestamp_format.clone());
        handlers.set_formatter(&formatter);
        config.format = format.to_string();
        internal::debug("LOGGER", &format!("Format set to '{format}'"));
        Ok(())
    }

    /// Creates a handler of `kind` from the current configuration.
    ///
    /// # Errors
    /// [`UsageError::AlreadyPresent`], or [`Error::Handler`] if the file can't be opened.
    pub fn add_handler(&self, kind: HandlerKind) -> Result<(), Error> {
        let mut handlers = self.handlers_mut();
        let config = self.config();
        let sink = self.make_sink(kind, &config);
        handlers.add(sink, config.level, Self::make_formatter(&config)?)
    }

    /// # Errors
    /// [`UsageError::NotPresent`].
    pub fn remove_handler(&self, kind: HandlerKind) -> Result<(), Error> {
        self.handlers_mut().remove(kind)
    }

    /// # Errors
    /// [`UsageError::NotPresent`], or [`Error::Handler`] if the file can't be reopened.
    pub fn enable_handler(&self, kind: HandlerKind) -> Result<(), Error> {
        self.handlers_mut().enable(kind)
    }

    /// # Errors
    /// [`UsageError::NotPresent`].
    pub fn disable_handler(&self, kind: HandlerKind) -> Result<(), Error> {
        self.handlers_mut().disable(kind)
    }

    /// Turns an output on or off. Turning on an absent handler creates it; turning off an
    /// absent handler does nothing. Idempotent either way.
    ///
    /// # Errors
    /// [`Error::Handler`] when a file handler can't be opened; state is unchanged.
    pub fn set_logging_enabled(&self, kind: HandlerKind, enabled: bool) -> Result<(), Error> {
        let mut handlers = self.handlers_mut();
        let state = handlers.state(kind);

        if enabled {
            if state.is_present() {
                handlers.enable(kind)?;
            } else {
                let config = self.config();
                let sink = self.make_sink(kind, &config);
                handlers.add(sink, config.level, Self::make_formatter(&config)?)?;
            }
        } else if state.is_present() {
            handlers.disable(kind)?;
        }

        let mut config = self.config_mut();
        match kind {
            HandlerKind::Console => config.log_to_console = enabled,
            HandlerKind::File => config.log_to_file = enabled,
        }
        Ok(())
    }

    /// # Errors
    /// See [`Logger::set_logging_enabled`].
    pub fn enable_console_logging(&self, enabled: bool) -> Result<(), Error> {
        self.set_logging_enabled(HandlerKind::Console, enabled)
    }

    /// # Errors
    /// See [`Logger::set_logging_enabled`].
    pub fn enable_file_logging(&self, enabled: bool) -> Result<(), Error> {
        self.set_logging_enabled(HandlerKind::File, enabled)
    }

    #[must_use]
    pub fn handler_state(&self, kind: HandlerKind) -> HandlerState {
        self.handlers().state(kind)
    }

    #[must_use]
    pub fn handler_level(&self, kind: HandlerKind) -> Option<Level> {
        self.handlers().get(kind).map(|h| h.level())
    }

    /// The template string a present handler is currently rendering with.
    #[must_use]
    pub fn handler_format(&self, kind: HandlerKind) -> Option<String> {
        self.handlers()
            .get(kind)
            .map(|h| h.formatter().template().as_str().to_string())
    }

    #[must_use]
    pub fn file_stats(&self) -> Option<FileStats> {
        self.handlers().file_stats()
    }

    /// # Errors
    /// The first handler flush failure.
    pub fn flush(&self) -> Result<(), Error> {
        Ok(self.handlers().flush()?)
    }

    /// Releases every handler. Later records are dropped silently; handlers can be added again.
    pub fn shutdown(&self) {
        self.handlers_mut().close_all();
        internal::debug("LOGGER", &format!("Logger '{}' shut down", self.name));
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_u8(self.threshold.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn format(&self) -> String {
        self.config().format.clone()
    }

    /// The directory as configured, before `~` and variable expansion.
    #[must_use]
    pub fn path(&self) -> String {
        self.config().path.clone()
    }

    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.config().max_bytes
    }

    #[must_use]
    pub fn backup_count(&self) -> u64 {
        self.config().backup_count
    }

    #[must_use]
    pub fn colored(&self) -> bool {
        self.config().colored
    }

    /// Snapshot of the active configuration, including runtime changes.
    #[must_use]
    pub fn config_snapshot(&self) -> LoggerConfig {
        self.config().clone()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.handlers
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .close_all();
    }
}
