//! Transcript buffer for one login attempt.
//!
//! Every fragment read during a Telnet handshake is appended here verbatim
//! so the caller can log exactly what the device printed. The buffer lives
//! for one `authenticate` call and is handed out (or attached to the error)
//! when the attempt ends.

use bytes::BytesMut;

use super::patterns::PromptMatcher;

/// Ordered concatenation of channel output fragments.
#[derive(Debug, Default)]
pub struct Transcript {
    /// The accumulated output.
    buffer: BytesMut,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Append a fragment. Empty fragments are a no-op.
    pub fn extend(&mut self, fragment: &[u8]) {
        self.buffer.extend_from_slice(fragment);
    }

    /// Search the whole transcript.
    pub fn contains(&self, matcher: &impl PromptMatcher) -> bool {
        matcher.is_match(&self.buffer)
    }

    /// Get a reference to the transcript contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the transcript as a string (lossy UTF-8 conversion).
    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    /// Consume the transcript into an owned string.
    pub fn into_string(self) -> String {
        match String::from_utf8(self.buffer.to_vec()) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been read yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Marker;

    #[test]
    fn test_extend_concatenates() {
        let mut transcript = Transcript::new();
        transcript.extend(b"Enter Username:");
        transcript.extend(b"");
        transcript.extend(b"Enter Password:");
        assert_eq!(transcript.as_slice(), b"Enter Username:Enter Password:");
        assert_eq!(transcript.len(), 30);
    }

    #[test]
    fn test_escape_sequences_are_kept() {
        let mut transcript = Transcript::new();
        transcript.extend(b"\x1b[2J\x19switch>");
        assert_eq!(transcript.into_string(), "\x1b[2J\x19switch>");
    }

    #[test]
    fn test_contains_searches_everything() {
        let mut transcript = Transcript::new();
        transcript.extend(b"Enter Ctrl-Y to begin.");
        transcript.extend(&[b'x'; 5000]);
        assert!(transcript.contains(&Marker::literal("Ctrl-Y")));
        assert!(!transcript.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let mut transcript = Transcript::new();
        transcript.extend(&[0xff, b'#']);
        assert_eq!(transcript.as_str_lossy(), "\u{fffd}#");
        assert_eq!(transcript.into_string(), "\u{fffd}#");
    }
}
