//! Recognizers: what to look for in console output and how to answer it.

use bytes::Bytes;
use indexmap::IndexMap;

use crate::channel::{Marker, PromptMatcher};

/// Well-known recognizer names used by the built-in profiles.
pub mod names {
    /// "Enter Ctrl-Y to begin." style banner.
    pub const BEGIN_SESSION: &str = "begin_session";
    /// Menu screen that has to be skipped.
    pub const MENU: &str = "menu";
    /// Username prompt.
    pub const USERNAME: &str = "username";
    /// Password prompt.
    pub const PASSWORD: &str = "password";
    /// Primary prompt terminator (`#`).
    pub const PRI_PROMPT: &str = "pri_prompt";
    /// Alternate prompt terminator (`>`).
    pub const ALT_PROMPT: &str = "alt_prompt";
}

/// Response to a recognized prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    /// Write a control sequence verbatim.
    SendControl(Bytes),

    /// Write the username followed by the line terminator.
    SendUsername,

    /// Write the password followed by the line terminator.
    SendPassword,

    /// Write a menu selection verbatim.
    SelectMenu(Bytes),

    /// An operational prompt is showing; login is done.
    DeclareSuccess,

    /// Known output that needs no answer.
    ContinueWaiting,
}

/// A (pattern, action) pair.
#[derive(Debug, Clone)]
pub struct Recognizer {
    /// What to look for.
    pub marker: Marker,

    /// What to do when it shows up.
    pub action: LoginAction,
}

impl Recognizer {
    /// Create a new recognizer.
    pub fn new(marker: Marker, action: LoginAction) -> Self {
        Self { marker, action }
    }

    /// Check a fragment against this recognizer.
    pub fn matches(&self, fragment: &[u8]) -> bool {
        self.marker.is_match(fragment)
    }
}

/// Ordered, named set of recognizers.
///
/// Evaluation order is insertion order. Replacing a recognizer by name
/// keeps its position, so profiles can swap a pattern without reordering.
#[derive(Debug, Clone, Default)]
pub struct RecognizerSet {
    recognizers: IndexMap<String, Recognizer>,
}

impl RecognizerSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a recognizer.
    pub fn with(mut self, name: impl Into<String>, recognizer: Recognizer) -> Self {
        self.insert(name, recognizer);
        self
    }

    /// Add or replace a recognizer in place.
    pub fn insert(&mut self, name: impl Into<String>, recognizer: Recognizer) {
        self.recognizers.insert(name.into(), recognizer);
    }

    /// Remove a recognizer, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Recognizer> {
        self.recognizers.shift_remove(name)
    }

    /// Get a recognizer by name.
    pub fn get(&self, name: &str) -> Option<&Recognizer> {
        self.recognizers.get(name)
    }

    /// Iterate in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Recognizer)> {
        self.recognizers.iter().map(|(name, r)| (name.as_str(), r))
    }

    /// Recognizers that fire on `fragment`, in evaluation order.
    pub fn matching<'a>(
        &'a self,
        fragment: &'a [u8],
    ) -> impl Iterator<Item = (&'a str, &'a Recognizer)> + 'a {
        self.iter().filter(move |(_, r)| r.matches(fragment))
    }

    /// Whether any success recognizer fires on `fragment`.
    pub fn declares_success(&self, fragment: &[u8]) -> bool {
        self.recognizers
            .values()
            .any(|r| r.action == LoginAction::DeclareSuccess && r.matches(fragment))
    }

    /// Number of recognizers.
    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecognizerSet {
        RecognizerSet::new()
            .with(
                names::BEGIN_SESSION,
                Recognizer::new(
                    Marker::literal("Ctrl-Y"),
                    LoginAction::SendControl(Bytes::from_static(b"\x19")),
                ),
            )
            .with(
                names::USERNAME,
                Recognizer::new(Marker::literal("sername"), LoginAction::SendUsername),
            )
            .with(
                names::PRI_PROMPT,
                Recognizer::new(
                    Marker::prompt_terminator(r"#\s*$").unwrap(),
                    LoginAction::DeclareSuccess,
                ),
            )
    }

    #[test]
    fn test_matching_keeps_order_and_allows_several() {
        let set = sample();
        let hits: Vec<&str> = set
            .matching(b"Enter Ctrl-Y to begin. Username:")
            .map(|(name, _)| name)
            .collect();
        assert_eq!(hits, vec![names::BEGIN_SESSION, names::USERNAME]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let set = sample().with(
            names::BEGIN_SESSION,
            Recognizer::new(Marker::literal("Press any key"), LoginAction::ContinueWaiting),
        );
        let order: Vec<&str> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(
            order,
            vec![names::BEGIN_SESSION, names::USERNAME, names::PRI_PROMPT]
        );
        assert_eq!(
            set.get(names::BEGIN_SESSION).unwrap().action,
            LoginAction::ContinueWaiting
        );
    }

    #[test]
    fn test_remove() {
        let mut set = sample();
        assert!(set.remove(names::BEGIN_SESSION).is_some());
        assert!(set.remove(names::MENU).is_none());
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_declares_success() {
        let set = sample();
        assert!(set.declares_success(b"\r\nswitch#"));
        assert!(!set.declares_success(b"Enter Username:"));
    }
}
