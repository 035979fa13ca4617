//! Pattern matching utilities for login prompt recognition.

use memchr::memmem;
use regex::bytes::{Regex, RegexBuilder};

/// Trait for prompt matching - regex by default, extensible for custom parsers.
pub trait PromptMatcher: Send + Sync {
    /// Returns byte offset where match ends, or None if no match.
    fn find_match(&self, data: &[u8]) -> Option<usize>;

    /// Check if the data matches the pattern.
    fn is_match(&self, data: &[u8]) -> bool {
        self.find_match(data).is_some()
    }
}

/// Regex-based prompt matcher (the default implementation).
impl PromptMatcher for Regex {
    fn find_match(&self, data: &[u8]) -> Option<usize> {
        self.find(data).map(|m| m.end())
    }
}

/// What a recognizer looks for in a fragment.
///
/// Console banners are matched as plain case-sensitive substrings
/// (`"Ctrl-Y"`, `"sername"`); credential prompts and prompt terminators
/// need a regex.
#[derive(Debug, Clone)]
pub enum Marker {
    /// Case-sensitive substring.
    Literal(String),

    /// Compiled regular expression.
    Pattern(Regex),
}

impl Marker {
    /// Substring marker.
    pub fn literal(text: impl Into<String>) -> Self {
        Marker::Literal(text.into())
    }

    /// Regex marker, compiled as written.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Marker::Pattern(Regex::new(pattern)?))
    }

    /// Case-insensitive regex, used for username/password prompts.
    pub fn credential_prompt(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Marker::Pattern(
            RegexBuilder::new(pattern).case_insensitive(true).build()?,
        ))
    }

    /// Multi-line regex, used for prompt terminators (`$` matches at every
    /// line end, not only the end of the fragment).
    pub fn prompt_terminator(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Marker::Pattern(
            RegexBuilder::new(pattern).multi_line(true).build()?,
        ))
    }

    /// Human readable form for log lines.
    pub fn as_str(&self) -> &str {
        match self {
            Marker::Literal(text) => text,
            Marker::Pattern(regex) => regex.as_str(),
        }
    }
}

impl PromptMatcher for Marker {
    fn find_match(&self, data: &[u8]) -> Option<usize> {
        match self {
            Marker::Literal(text) => {
                memmem::find(data, text.as_bytes()).map(|start| start + text.len())
            }
            Marker::Pattern(regex) => regex.find_match(data),
        }
    }
}
