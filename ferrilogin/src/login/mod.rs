//! Login handshake automatons.
//!
//! Two implementations of [`Authenticator`] exist, one per transport:
//!
//! - [`ByteLogin`] for SSH. The transport already authenticated the
//!   session, but some consoles still ask again inside the shell. Each
//!   fragment is judged on its own and the routine returns as soon as the
//!   password has been sent.
//! - [`LineLogin`] for Telnet, which has no authentication of its own. The
//!   whole username/password exchange is scripted here and the routine only
//!   succeeds once an operational prompt shows up.
//!
//! Both share the same plumbing: poll, match recognizers, answer, sleep a
//! scaled interval, repeat until done or out of budget. On a failed login
//! the channel is closed before the error is returned.

mod builder;
mod recognizer;
mod ssh;
mod telnet;

pub use builder::{Login, LoginBuilder, Transport};
pub use recognizer::{LoginAction, Recognizer, RecognizerSet, names};
pub use ssh::{ByteLogin, ByteLoginConfig};
pub use telnet::{LineLogin, LineLoginConfig};

use std::fmt;
use std::future::Future;

use bytes::Bytes;
use log::{debug, trace, warn};
use secrecy::{ExposeSecret, SecretString};

use crate::channel::{RawChannel, Transcript};
use crate::config::{TimingPolicy, check_delay_factor};
use crate::error::{AuthFailure, AuthenticationError, Error, Result};

/// Capability shared by every login variant.
pub trait Authenticator: Send + Sync {
    /// Host this login targets, used in errors.
    fn host(&self) -> &str;

    /// Run the handshake on a channel sitting at the login banner.
    ///
    /// `delay_factor` is normalized through the login's [`TimingPolicy`]
    /// before scaling any sleep.
    fn authenticate<C: RawChannel>(
        &self,
        channel: &mut C,
        delay_factor: f64,
    ) -> impl Future<Output = Result<LoginOutcome>> + Send;
}

/// Username and password for the console login.
pub struct Credentials {
    /// Login name.
    pub username: String,

    /// Password. May be empty for password-less consoles.
    pub password: SecretString,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Username followed by `terminator`.
    pub(crate) fn username_line(&self, terminator: &[u8]) -> Vec<u8> {
        line(self.username.as_bytes(), terminator)
    }

    /// Password followed by `terminator`.
    pub(crate) fn password_line(&self, terminator: &[u8]) -> Vec<u8> {
        line(self.password.expose_secret().as_bytes(), terminator)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn line(text: &[u8], terminator: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + terminator.len());
    out.extend_from_slice(text);
    out.extend_from_slice(terminator);
    out
}

/// How a successful handshake ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    /// An operational prompt was seen.
    PromptConfirmed,

    /// The password was sent; nothing was waited for afterwards.
    CredentialsSent,

    /// Loop budget ran out without a password prompt. Only the SSH
    /// variant returns this; the caller decides what it means.
    Unconfirmed,
}

/// Result of a handshake that did not fail.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// How the handshake ended.
    pub status: LoginStatus,

    /// Read cycles consumed, including a final probe.
    pub cycles: u32,

    /// Everything read, for variants that keep a transcript.
    pub transcript: Option<String>,
}

impl LoginOutcome {
    /// Whether a prompt was actually seen.
    pub fn is_confirmed(&self) -> bool {
        self.status == LoginStatus::PromptConfirmed
    }

    /// The captured transcript, if any.
    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }
}

/// Per-invocation handshake plumbing.
///
/// Owns nothing beyond one attempt: the borrowed channel, the effective
/// delay factor and, for Telnet, the transcript. Every channel failure
/// goes through [`Handshake::fail`] so the channel is closed exactly once
/// before the error leaves.
pub(crate) struct Handshake<'a, C> {
    channel: &'a mut C,
    host: &'a str,
    timing: TimingPolicy,
    factor: f64,
    transcript: Option<Transcript>,
}

impl<'a, C: RawChannel> Handshake<'a, C> {
    /// Start an attempt, normalizing the requested delay factor.
    pub(crate) fn new(
        channel: &'a mut C,
        host: &'a str,
        timing: TimingPolicy,
        requested: f64,
    ) -> Result<Self> {
        check_delay_factor(requested)?;
        timing.validate()?;
        let factor = timing.select_delay_factor(requested);
        timing.try_interval(1.0, factor)?;
        debug!("{}: starting login (delay factor {})", host, factor);
        Ok(Self {
            channel,
            host,
            timing,
            factor,
            transcript: None,
        })
    }

    /// Keep every fragment read from here on.
    pub(crate) fn recording(mut self) -> Self {
        self.transcript = Some(Transcript::new());
        self
    }

    /// Read one fragment. A channel error ends the attempt.
    pub(crate) async fn read(&mut self) -> Result<Bytes> {
        match self.channel.read_nonblocking().await {
            Ok(fragment) => {
                if !fragment.is_empty() {
                    trace!("{}: read {:?}", self.host, String::from_utf8_lossy(&fragment));
                }
                if let Some(transcript) = self.transcript.as_mut() {
                    transcript.extend(&fragment);
                }
                Ok(fragment)
            }
            Err(e) => {
                debug!("{}: read failed: {}", self.host, e);
                Err(self.fail(AuthFailure::ChannelClosed).await)
            }
        }
    }

    /// Write raw bytes. A channel error ends the attempt.
    pub(crate) async fn write(&mut self, data: &[u8]) -> Result<()> {
        if let Err(e) = self.channel.write(data).await {
            debug!("{}: write failed: {}", self.host, e);
            return Err(self.fail(AuthFailure::ChannelClosed).await);
        }
        Ok(())
    }

    /// Sleep `ticks` scaled by the effective delay factor.
    pub(crate) async fn pause(&mut self, ticks: f64) {
        let interval = self.timing.interval(ticks, self.factor);
        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }

    /// Close the channel and build the error for this attempt.
    pub(crate) async fn fail(&mut self, kind: AuthFailure) -> Error {
        if let Err(e) = self.channel.close().await {
            warn!("{}: failed to close channel: {}", self.host, e);
        }
        warn!("Login failed: {} ({})", self.host, kind);
        let transcript = self
            .transcript
            .take()
            .map(Transcript::into_string)
            .unwrap_or_default();
        AuthenticationError::new(self.host, kind, transcript).into()
    }

    /// Finish successfully, handing back the transcript.
    pub(crate) fn finish(self, status: LoginStatus, cycles: u32) -> LoginOutcome {
        debug!("{}: login finished ({:?} after {} cycles)", self.host, status, cycles);
        LoginOutcome {
            status,
            cycles,
            transcript: self.transcript.map(Transcript::into_string),
        }
    }
}

/// Cycle count reported once a loop of `max_loops` ran out.
pub(crate) fn exhausted_cycles(max_loops: u32) -> u32 {
    max_loops.saturating_add(1)
}

/// Assert virtual time moved by `expected`, allowing for timer rounding.
#[cfg(test)]
pub(crate) fn assert_elapsed(start: tokio::time::Instant, expected: std::time::Duration) {
    let elapsed = start.elapsed();
    let slack = std::time::Duration::from_millis(20);
    assert!(
        elapsed >= expected && elapsed <= expected + slack,
        "elapsed {elapsed:?}, expected {expected:?}"
    );
}
