//! Record layout templates. The console and the file handler share one template string,
//! but each handler keeps its own parsed copy so a reformat can swap them independently.

/// Known substitution tokens. Unknown `{names}` pass through as literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Timestamp,
    Level,
    Msg,
    Name,
}

impl Placeholder {
    /// Brace form, e.g. `{msg}`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Level => "level",
            Self::Msg => "msg",
            Self::Name => "name",
        }
    }

    /// Percent form accepted for compatibility, e.g. `%(message)s`.
    #[must_use]
    pub const fn percent_name(self) -> &'static str {
        match self {
            Self::Timestamp => "asctime",
            Self::Level => "levelname",
            Self::Msg => "message",
            Self::Name => "name",
        }
    }

    pub const ALL: &'static [Self] = &[Self::Timestamp, Self::Level, Self::Msg, Self::Name];

    fn from_brace(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ph| ph.as_str() == name)
    }

    fn from_percent(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ph| ph.percent_name() == name)
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSegment {
    /// Separators and unknown `{names}` pass through untouched.
    Literal(String),
    /// Known tokens are substituted at render time.
    Placeholder(Placeholder),
}

/// Pre-parsed template: parse once, render many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    source: String,
    segments: Vec<FormatSegment>,
}

impl FormatTemplate {
    /// Layout used when the configuration does not name one.
    pub const DEFAULT: &'static str = "{timestamp} - {level} - {msg}";

    /// Turns `"{timestamp} - {level} - {msg}"` (or `"%(asctime)s - %(message)s"`) into segments.
    #[must_use]
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let chars: Vec<char> = template.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if let Some((ph, next)) = Self::placeholder_at(&chars, i) {
                if !current.is_empty() {
                    segments.push(FormatSegment::Literal(std::mem::take(&mut current)));
                }
                segments.push(FormatSegment::Placeholder(ph));
                i = next;
                continue;
            }

            current.push(chars[i]);
            i += 1;
        }

        if !current.is_empty() {
            segments.push(FormatSegment::Literal(current));
        }

        Self {
            source: template.to_string(),
            segments,
        }
    }

    /// Recognises `{name}` and `%(name)s` at `start`, returning the placeholder and the index past it.
    fn placeholder_at(chars: &[char], start: usize) -> Option<(Placeholder, usize)> {
        match chars[start] {
            '{' => {
                let end = start + chars[start..].iter().position(|&c| c == '}')?;
                let name: String = chars[start + 1..end].iter().collect();
                Placeholder::from_brace(&name).map(|ph| (ph, end + 1))
            }
            '%' if chars.get(start + 1) == Some(&'(') => {
                let close = start + chars[start..].iter().position(|&c| c == ')')?;
                if chars.get(close + 1) != Some(&'s') {
                    return None;
                }
                let name: String = chars[start + 2..close].iter().collect();
                Placeholder::from_percent(&name).map(|ph| (ph, close + 2))
            }
            _ => None,
        }
    }

    /// The template string this was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn segments(&self) -> &[FormatSegment] {
        &self.segments
    }

    /// Whether the template renders the given placeholder anywhere.
    #[must_use]
    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| *s == FormatSegment::Placeholder(placeholder))
    }

    /// Substitutes values into the pre-parsed segments.
    #[must_use]
    pub fn render(&self, values: &FormatValues<'_>) -> String {
        let mut result = String::with_capacity(self.source.len() + values.msg.len());

        for segment in &self.segments {
            match segment {
                FormatSegment::Literal(s) => result.push_str(s),
                FormatSegment::Placeholder(ph) => result.push_str(match ph {
                    Placeholder::Timestamp => values.timestamp,
                    Placeholder::Level => values.level,
                    Placeholder::Msg => values.msg,
                    Placeholder::Name => values.name,
                }),
            }
        }

        result
    }
}

impl Default for FormatTemplate {
    fn default() -> Self {
        Self::parse(Self::DEFAULT)
    }
}

/// One field per placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatValues<'a> {
    pub timestamp: &'a str,
    pub level: &'a str,
    pub msg: &'a str,
    pub name: &'a str,
}
