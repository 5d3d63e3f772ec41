//! Owns the console and file handlers and everything that can be changed about them.
//!
//! Each kind moves through `Absent → Present(enabled | disabled) → Removed`; a removed kind
//! may be added again. The manager itself is not synchronised; [`crate::Logger`] wraps it
//! in an `RwLock`. Each sink sits behind its own `Mutex` so dispatch only needs shared
//! access to the manager.

use crate::error::{Error, UsageError};
use crate::fmt::Formatter;
use crate::internal;
use crate::level::Level;
use crate::output::{FileStats, HandlerError, HandlerKind, LogRecord, Sink};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Observable lifecycle state of one handler kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// Never added.
    Absent,
    Enabled,
    Disabled,
    /// Added, then removed. Can be added again.
    Removed,
}

impl HandlerState {
    #[must_use]
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Enabled | Self::Disabled)
    }
}

/// One handler: sink, enablement, level and formatter. Formatter and level are never absent,
/// so an enabled handler always has both.
pub struct HandlerRecord {
    kind: HandlerKind,
    enabled: bool,
    level: Level,
    formatter: Formatter,
    sink: Mutex<Sink>,
}

impl HandlerRecord {
    fn sink(&self) -> MutexGuard<'_, Sink> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sink_mut(&mut self) -> &mut Sink {
        self.sink.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub const fn kind(&self) -> HandlerKind {
        self.kind
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub const fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Formats with this handler's formatter and writes, if the handler wants the record.
    fn emit(&self, record: &LogRecord) -> Option<Result<(), HandlerError>> {
        if !self.enabled || record.level < self.level {
            return None;
        }
        let line = self.formatter.format(record);
        Some(self.sink().write(record.level, &line))
    }
}

enum Slot {
    Absent,
    Present(HandlerRecord),
    Removed,
}

impl Slot {
    const fn record(&self) -> Option<&HandlerRecord> {
        match self {
            Self::Present(record) => Some(record),
            Self::Absent | Self::Removed => None,
        }
    }

    const fn record_mut(&mut self) -> Option<&mut HandlerRecord> {
        match self {
            Self::Present(record) => Some(record),
            Self::Absent | Self::Removed => None,
        }
    }
}

/// Outcome of one `log_message` call. Failures of one handler never stop delivery to the other.
#[derive(Debug, Default)]
pub struct Dispatch {
    /// Handlers that accepted the record.
    pub delivered: Vec<HandlerKind>,
    /// Handlers that wanted the record but failed to write it.
    pub failures: Vec<HandlerError>,
    dropped: bool,
}

impl Dispatch {
    /// Below the logger's threshold; no handler was consulted.
    pub(crate) fn dropped() -> Self {
        Self {
            dropped: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn was_dropped(&self) -> bool {
        self.dropped
    }

    #[must_use]
    pub fn delivered_to(&self, kind: HandlerKind) -> bool {
        self.delivered.contains(&kind)
    }

    /// Nothing failed (which includes "nothing was written").
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Holds at most one handler per kind.
pub struct HandlerManager {
    console: Slot,
    file: Slot,
}

impl Default for HandlerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerManager {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            console: Slot::Absent,
            file: Slot::Absent,
        }
    }

    const fn slot(&self, kind: HandlerKind) -> &Slot {
        match kind {
            HandlerKind::Console => &self.console,
            HandlerKind::File => &self.file,
        }
    }

    const fn slot_mut(&mut self, kind: HandlerKind) -> &mut Slot {
        match kind {
            HandlerKind::Console => &mut self.console,
            HandlerKind::File => &mut self.file,
        }
    }

    fn present_mut(&mut self, kind: HandlerKind) -> Result<&mut HandlerRecord, UsageError> {
        self.slot_mut(kind)
            .record_mut()
            .ok_or(UsageError::NotPresent(kind))
    }

    fn records(&self) -> impl Iterator<Item = &HandlerRecord> {
        [&self.console, &self.file]
            .into_iter()
            .filter_map(Slot::record)
    }

    fn records_mut(&mut self) -> impl Iterator<Item = &mut HandlerRecord> {
        [&mut self.console, &mut self.file]
            .into_iter()
            .filter_map(Slot::record_mut)
    }

    #[must_use]
    pub fn state(&self, kind: HandlerKind) -> HandlerState {
        match self.slot(kind) {
            Slot::Absent => HandlerState::Absent,
            Slot::Removed => HandlerState::Removed,
            Slot::Present(record) if record.enabled => HandlerState::Enabled,
            Slot::Present(_) => HandlerState::Disabled,
        }
    }

    #[must_use]
    pub fn get(&self, kind: HandlerKind) -> Option<&HandlerRecord> {
        self.slot(kind).record()
    }

    /// Opens the sink and installs it enabled.
    ///
    /// # Errors
    /// [`UsageError::AlreadyPresent`] if the kind is present; [`HandlerError::Open`] if the
    /// sink's resource can't be acquired (the manager is unchanged either way).
    pub fn add(&mut self, mut sink: Sink, level: Level, formatter: Formatter) -> Result<(), Error> {
        let kind = sink.kind();
        if self.state(kind).is_present() {
            return Err(UsageError::AlreadyPresent(kind).into());
        }

        sink.open()?;
        *self.slot_mut(kind) = Slot::Present(HandlerRecord {
            kind,
            enabled: true,
            level,
            formatter,
            sink: Mutex::new(sink),
        });
        internal::debug("HANDLER", &format!("Added {kind} handler at {level}"));
        Ok(())
    }

    /// Releases the handler's resource and marks the kind removed.
    ///
    /// # Errors
    /// [`UsageError::NotPresent`].
    pub fn remove(&mut self, kind: HandlerKind) -> Result<(), Error> {
        let slot = self.slot_mut(kind);
        if slot.record().is_none() {
            return Err(UsageError::NotPresent(kind).into());
        }

        if let Slot::Present(mut record) = std::mem::replace(slot, Slot::Removed) {
            release(&mut record);
        }
        internal::debug("HANDLER", &format!("Removed {kind} handler"));
        Ok(())
    }

    /// Re-acquires the resource of a disabled handler. Enabling an enabled handler is a no-op.
    ///
    /// # Errors
    /// [`UsageError::NotPresent`], or [`HandlerError::Open`] (the handler stays disabled).
    pub fn enable(&mut self, kind: HandlerKind) -> Result<(), Error> {
        let record = self.present_mut(kind)?;
        if record.enabled {
            return Ok(());
        }
        record.sink_mut().open()?;
        record.enabled = true;
        internal::debug("HANDLER", &format!("Enabled {kind} handler"));
        Ok(())
    }

    /// Releases the resource but keeps the handler (and its rotation bookkeeping).
    /// Disabling a disabled handler is a no-op.
    ///
    /// # Errors
    /// [`UsageError::NotPresent`].
    pub fn disable(&mut self, kind: HandlerKind) -> Result<(), Error> {
        let record = self.present_mut(kind)?;
        if !record.enabled {
            return Ok(());
        }
        record.enabled = false;
        release(record);
        internal::debug("HANDLER", &format!("Disabled {kind} handler"));
        Ok(())
    }

    /// Every present handler adopts `level`. Infallible: the level was validated by its type.
    pub fn set_level(&mut self, level: Level) {
        for record in self.records_mut() {
            record.level = level;
        }
    }

    /// # Errors
    /// [`UsageError::NotPresent`].
    pub fn set_handler_level(&mut self, kind: HandlerKind, level: Level) -> Result<(), Error> {
        self.present_mut(kind)?.level = level;
        Ok(())
    }

    /// Every present handler adopts a copy of `formatter`. Parsing happened before this call,
    /// so there is nothing left that could fail half-way.
    pub fn set_formatter(&mut self, formatter: &Formatter) {
        for record in self.records_mut() {
            record.formatter = formatter.clone();
        }
    }

    /// Delivers `record` to every enabled handler whose level admits it. Each handler's
    /// failure is reported to the fallback stream and collected; the loop always continues.
    #[must_use]
    pub fn dispatch(&self, record: &LogRecord) -> Dispatch {
        let mut outcome = Dispatch::default();
        for handler in self.records() {
            match handler.emit(record) {
                None => {}
                Some(Ok(())) => outcome.delivered.push(handler.kind),
                Some(Err(e)) => {
                    internal::error("HANDLER", &e.to_string());
                    outcome.failures.push(e);
                }
            }
        }
        outcome
    }

    /// Flushes every enabled handler.
    ///
    /// # Errors
    /// The first flush failure; later handlers are still flushed.
    pub fn flush(&self) -> Result<(), HandlerError> {
        let mut first = None;
        for record in self.records().filter(|r| r.enabled) {
            if let Err(e) = record.sink().flush() {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Releases every handler. Used on shutdown and drop.
    pub fn close_all(&mut self) {
        for kind in HandlerKind::all() {
            let _ = self.remove(kind);
        }
    }

    /// Rotation bookkeeping of the file handler, if one is present.
    #[must_use]
    pub fn file_stats(&self) -> Option<FileStats> {
        self.file.record().and_then(|record| match &*record.sink() {
            Sink::File(file) => Some(file.stats()),
            Sink::Console(_) => None,
        })
    }
}

/// Resources are dropped even if the final flush fails; the failure is only reported.
fn release(record: &mut HandlerRecord) {
    if let Err(e) = record.sink_mut().close() {
        internal::warning("HANDLER", &e.to_string());
    }
}
