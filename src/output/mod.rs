//! The two sink kinds a logger can own. They form a closed set, so dispatch is a `match`
//! over [`Sink`] rather than a trait object.

mod console;
mod file;

pub use console::{ConsoleSink, ConsoleTarget};
pub use file::{FileSink, FileStats};

use crate::level::Level;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

/// Carries everything a formatter needs to render one line. Built once per call and shared
/// by every handler, so all sinks see the same timestamp.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub logger_name: String,
    pub timestamp: DateTime<Local>,
}

impl LogRecord {
    #[must_use]
    pub fn new(level: Level, logger_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            logger_name: logger_name.into(),
            timestamp: Local::now(),
        }
    }
}

/// Which sink a handler writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Console,
    File,
}

impl HandlerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::File => "file",
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Console, Self::File]
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sink failed. Reported per handler; never fatal to the logger as a whole.
#[derive(Debug)]
pub enum HandlerError {
    /// The log file or its directory could not be created or opened.
    Open { path: PathBuf, source: std::io::Error },
    /// Writing a formatted record failed.
    Write {
        kind: HandlerKind,
        source: std::io::Error,
    },
    /// A rename or delete during rotation failed; the active file was kept.
    Rotate { path: PathBuf, source: std::io::Error },
    /// Flushing buffered output failed.
    Flush {
        kind: HandlerKind,
        source: std::io::Error,
    },
}

impl HandlerError {
    #[must_use]
    pub const fn kind(&self) -> HandlerKind {
        match self {
            Self::Open { .. } | Self::Rotate { .. } => HandlerKind::File,
            Self::Write { kind, .. } | Self::Flush { kind, .. } => *kind,
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => write!(f, "cannot open {}: {source}", path.display()),
            Self::Write { kind, source } => write!(f, "{kind} write failed: {source}"),
            Self::Rotate { path, source } => {
                write!(f, "rotation of {} failed: {source}", path.display())
            }
            Self::Flush { kind, source } => write!(f, "{kind} flush failed: {source}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Write { source, .. }
            | Self::Rotate { source, .. }
            | Self::Flush { source, .. } => Some(source),
        }
    }
}

/// A handler's destination.
pub enum Sink {
    Console(ConsoleSink),
    File(FileSink),
}

impl Sink {
    #[must_use]
    pub const fn kind(&self) -> HandlerKind {
        match self {
            Self::Console(_) => HandlerKind::Console,
            Self::File(_) => HandlerKind::File,
        }
    }

    /// Acquires the underlying resource. A no-op for the console and for an already-open file.
    ///
    /// # Errors
    /// [`HandlerError::Open`] when the log file cannot be opened.
    pub fn open(&mut self) -> Result<(), HandlerError> {
        match self {
            Self::Console(_) => Ok(()),
            Self::File(file) => file.open(),
        }
    }

    /// Releases the underlying resource. The file handle is dropped even when the final flush fails.
    ///
    /// # Errors
    /// [`HandlerError::Flush`] from the final flush.
    pub fn close(&mut self) -> Result<(), HandlerError> {
        match self {
            Self::Console(console) => console.flush(),
            Self::File(file) => file.close(),
        }
    }

    /// Writes one already-formatted line.
    ///
    /// # Errors
    /// [`HandlerError::Write`] (or [`HandlerError::Open`] if a closed file cannot be reopened).
    pub fn write(&mut self, level: Level, line: &str) -> Result<(), HandlerError> {
        match self {
            Self::Console(console) => console.write(level, line),
            Self::File(file) => file.write(line),
        }
    }

    /// # Errors
    /// [`HandlerError::Flush`].
    pub fn flush(&mut self) -> Result<(), HandlerError> {
        match self {
            Self::Console(console) => console.flush(),
            Self::File(file) => file.flush(),
        }
    }
}
