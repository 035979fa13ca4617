//! Error types for ferrilogin.

use std::io;
use thiserror::Error;

/// Main error type for ferrilogin operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Raw channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Login handshake failures
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// Builder and profile configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Raw channel errors (end of stream, I/O).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The remote end closed the stream
    #[error("Channel closed")]
    Closed,

    /// I/O error on the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Why a login handshake gave up.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// Loop budget (and the final probe) used up without seeing a prompt.
    #[error("no prompt after {cycles} read cycles")]
    Timeout { cycles: u32 },

    /// The channel ended or failed mid-handshake.
    #[error("channel closed during login")]
    ChannelClosed,
}

/// Terminal failure of one login attempt.
///
/// By the time this is returned the automaton has already closed the
/// channel; retrying means reconnecting.
#[derive(Error, Debug)]
#[error("Login failed: {host} ({kind})")]
pub struct AuthenticationError {
    /// Host the login was attempted against.
    pub host: String,

    /// Failure category.
    pub kind: AuthFailure,

    /// Everything read before the failure. Diagnostic only.
    pub transcript: String,
}

impl AuthenticationError {
    /// Create a new authentication error.
    pub fn new(host: impl Into<String>, kind: AuthFailure, transcript: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            kind,
            transcript: transcript.into(),
        }
    }

    /// Whether the budget ran out (as opposed to the channel dying).
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, AuthFailure::Timeout { .. })
    }
}

/// Configuration errors raised while building a login.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No username supplied
    #[error("Username is required")]
    MissingUsername,

    /// Neither a platform name nor a custom profile was given
    #[error("Platform must be specified")]
    MissingPlatform,

    /// Platform name not known to the profile lookup
    #[error("Unknown platform: {name}")]
    UnknownPlatform { name: String },

    /// A recognizer pattern failed to compile
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Delay factor must be finite and non-negative
    #[error("Invalid delay factor: {0}")]
    InvalidDelayFactor(f64),
}

/// Result type alias using ferrilogin's Error.
pub type Result<T> = std::result::Result<T, Error>;
