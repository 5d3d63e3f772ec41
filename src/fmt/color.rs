//! Console color coding. Each severity has one fixed style; the console handler decides
//! whether the stream can render it.

use crate::level::Level;
use std::fmt;

/// 24-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Truecolor foreground escape, `\x1b[38;2;R;G;Bm`.
    #[must_use]
    pub fn fg_ansi(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    /// Terminates any active SGR styling so subsequent text returns to the terminal default.
    pub const RESET: &'static str = "\x1b[0m";

    /// SGR bold, paired with a color for the most severe level.
    pub const BOLD: &'static str = "\x1b[1m";

    #[must_use]
    pub const fn blue() -> Self {
        Self::new(98, 114, 164)
    }

    #[must_use]
    pub const fn green() -> Self {
        Self::new(80, 250, 123)
    }

    #[must_use]
    pub const fn yellow() -> Self {
        Self::new(241, 250, 140)
    }

    #[must_use]
    pub const fn red() -> Self {
        Self::new(255, 85, 85)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Display style for one severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStyle {
    pub color: Color,
    pub bold: bool,
}

impl LevelStyle {
    /// The fixed severity → style table.
    #[must_use]
    pub const fn for_level(level: Level) -> Self {
        let (color, bold) = match level {
            Level::Debug => (Color::blue(), false),
            Level::Info => (Color::green(), false),
            Level::Warning => (Color::yellow(), false),
            Level::Error => (Color::red(), false),
            Level::Critical => (Color::red(), true),
        };
        Self { color, bold }
    }

    /// Wraps `text` in this style's escape codes.
    #[must_use]
    pub fn paint(self, text: &str) -> String {
        let bold = if self.bold { Color::BOLD } else { "" };
        format!("{bold}{}{text}{}", self.color.fg_ansi(), Color::RESET)
    }
}

/// Most callers just want "color this line for that level".
#[must_use]
pub fn colorize(text: &str, level: Level) -> String {
    LevelStyle::for_level(level).paint(text)
}
