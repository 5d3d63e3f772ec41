//! magiklog's own diagnostics, and the fallback stream for handler failures.
//!
//! A failing sink can't report through itself, so these lines go straight to stderr.
//! The threshold defaults to WARNING so handler failures are always visible while
//! lifecycle chatter stays quiet; `MAGIKLOG_INTERNAL_LEVEL` or [`set_level`] lowers it.

use crate::level::Level;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

const ENV_LEVEL: &str = "MAGIKLOG_INTERNAL_LEVEL";

static THRESHOLD: OnceLock<AtomicU8> = OnceLock::new();

/// The environment is read once, on first use.
fn threshold() -> &'static AtomicU8 {
    THRESHOLD.get_or_init(|| {
        let level = std::env::var(ENV_LEVEL)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Level::Warning);
        AtomicU8::new(level.as_u8())
    })
}

/// Changes which internal diagnostics are printed.
pub fn set_level(level: Level) {
    threshold().store(level.as_u8(), Ordering::Relaxed);
}

#[must_use]
pub fn level() -> Level {
    Level::from_u8(threshold().load(Ordering::Relaxed))
}

/// Write errors are ignored: there is nowhere left to report them.
fn log(level: Level, scope: &str, msg: &str) {
    if level < self::level() {
        return;
    }
    let mut err = io::stderr().lock();
    let _ = writeln!(err, "[magiklog] {:<8} {scope:<7} {msg}", level.as_str());
}

/// Lifecycle events: handlers added, removed, files opened and rotated.
pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Recoverable trouble, e.g. a flush that failed while a handler was being released.
pub fn warning(scope: &str, msg: &str) {
    log(Level::Warning, scope, msg);
}

/// A handler lost a record or a rotation was abandoned.
pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
