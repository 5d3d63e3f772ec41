//! Record rendering: layout templates, the per-handler formatter, and console colors.

mod color;
mod format;
mod formatter;

pub use color::{Color, LevelStyle, colorize};
pub use format::{FormatSegment, FormatTemplate, FormatValues, Placeholder};
pub use formatter::{DEFAULT_TIMESTAMP_FORMAT, Formatter};
