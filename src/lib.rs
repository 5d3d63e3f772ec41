//! `magiklog` - leveled console and rotating-file logging with runtime reconfiguration.
//!
//! A logger owns at most one console handler and one file handler. Each can be added,
//! removed, enabled, disabled, re-leveled and reformatted while the application runs, and a
//! failure in one never silences the other.
//!
//! # Example
//!
//! ```no_run
//! use magiklog::{HandlerKind, Level, Logger, LoggerConfig};
//!
//! let mut config = LoggerConfig::new("app");
//! config.log_to_file = true;
//! config.max_bytes = 1_000_000;
//! config.backup_count = 3;
//!
//! let logger = Logger::new(config)?;
//! logger.info("Application started");
//!
//! logger.set_log_level("DEBUG")?;
//! logger.set_log_format("{level}: {msg}")?;
//! logger.debug("Now visible");
//!
//! logger.set_logging_enabled(HandlerKind::Console, false)?;
//! logger.error("File only");
//! # Ok::<(), magiklog::Error>(())
//! ```

pub mod config;
mod error;
pub mod fmt;
pub mod handler;
pub mod internal;
pub mod level;
pub mod logger;
pub mod output;

pub use config::{LoggerConfig, NoOutputPolicy, ValidationError};
pub use error::{Error, UsageError};
pub use handler::{Dispatch, HandlerState};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use output::{ConsoleTarget, FileStats, HandlerError, HandlerKind, LogRecord};
