//! Console sink. Writes to stderr by default; colors only reach a real terminal.

use super::{HandlerError, HandlerKind};
use crate::fmt::colorize;
use crate::level::Level;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Where console records go. `Clone` so a removed console handler can be re-added against
/// the same destination.
#[derive(Clone, Default)]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
    /// A caller-supplied stream, shared between re-created console handlers.
    Writer {
        writer: Arc<Mutex<dyn Write + Send>>,
        terminal: bool,
    },
}

impl ConsoleTarget {
    /// Wraps any stream. It is treated as a non-terminal until [`ConsoleTarget::terminal`] says otherwise.
    #[must_use]
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Self::Writer {
            writer: Arc::new(Mutex::new(writer)),
            terminal: false,
        }
    }

    /// Overrides terminal detection for a [`ConsoleTarget::Writer`]; ignored for the std streams.
    #[must_use]
    pub fn terminal(self, is_terminal: bool) -> Self {
        match self {
            Self::Writer { writer, .. } => Self::Writer {
                writer,
                terminal: is_terminal,
            },
            other => other,
        }
    }

    fn is_terminal(&self) -> bool {
        match self {
            Self::Stderr => io::stderr().is_terminal(),
            Self::Stdout => io::stdout().is_terminal(),
            Self::Writer { terminal, .. } => *terminal,
        }
    }
}

impl std::fmt::Debug for ConsoleTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => f.write_str("Stderr"),
            Self::Stdout => f.write_str("Stdout"),
            Self::Writer { terminal, .. } => f
                .debug_struct("Writer")
                .field("terminal", terminal)
                .finish_non_exhaustive(),
        }
    }
}

/// Terminal detection happens once at construction; a stream does not stop being a tty mid-run.
#[derive(Debug)]
pub struct ConsoleSink {
    target: ConsoleTarget,
    colored: bool,
    terminal: bool,
}

impl ConsoleSink {
    #[must_use]
    pub fn new(target: ConsoleTarget, colored: bool) -> Self {
        let terminal = target.is_terminal();
        Self {
            target,
            colored,
            terminal,
        }
    }

    /// Whether lines are actually being colored right now.
    #[must_use]
    pub const fn paints(&self) -> bool {
        self.colored && self.terminal
    }

    pub(super) fn write(&mut self, level: Level, line: &str) -> Result<(), HandlerError> {
        let painted;
        let text = if self.paints() {
            painted = colorize(line, level);
            painted.as_str()
        } else {
            line
        };

        let result = match &self.target {
            ConsoleTarget::Stderr => {
                let mut out = io::stderr().lock();
                writeln!(out, "{text}").and_then(|()| out.flush())
            }
            ConsoleTarget::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{text}").and_then(|()| out.flush())
            }
            ConsoleTarget::Writer { writer, .. } => {
                let mut out = writer.lock().unwrap_or_else(PoisonError::into_inner);
                writeln!(out, "{text}").and_then(|()| out.flush())
            }
        };

        result.map_err(|source| HandlerError::Write {
            kind: HandlerKind::Console,
            source,
        })
    }

    pub(super) fn flush(&mut self) -> Result<(), HandlerError> {
        let result = match &self.target {
            ConsoleTarget::Stderr => io::stderr().flush(),
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Writer { writer, .. } => writer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .flush(),
        };
        result.map_err(|source| HandlerError::Flush {
            kind: HandlerKind::Console,
            source,
        })
    }
}
