//! Byte-oriented login for consoles reached over SSH.
//!
//! The SSH layer already authenticated, but consoles like the Extreme ERS
//! still print "Enter Ctrl-Y to begin." and then prompt for credentials
//! again. Output arrives in arbitrary fragments, so each fragment is judged
//! on its own with plain substring markers.

use bytes::Bytes;
use log::debug;

use super::recognizer::{LoginAction, RecognizerSet};
use super::{Authenticator, Credentials, Handshake, LoginOutcome, LoginStatus, exhausted_cycles};
use crate::channel::RawChannel;
use crate::config::TimingPolicy;
use crate::error::Result;

/// Tunables for [`ByteLogin`].
#[derive(Debug, Clone)]
pub struct ByteLoginConfig {
    /// Recognizers, evaluated in order against every fragment.
    pub recognizers: RecognizerSet,

    /// Last cycle index; cycles run `0..=max_loops`.
    pub max_loops: u32,

    /// Line terminator appended to credentials and used as the nudge.
    pub return_sequence: Bytes,

    /// Ticks to wait after a cycle that produced output.
    pub output_delay: f64,

    /// Ticks to wait after an empty read.
    pub idle_delay: f64,
}

impl ByteLoginConfig {
    /// Create a config with the standard loop bound and intervals.
    pub fn new(recognizers: RecognizerSet) -> Self {
        Self {
            recognizers,
            max_loops: 12,
            return_sequence: Bytes::from_static(b"\n"),
            output_delay: 0.5,
            idle_delay: 1.0,
        }
    }

    /// Set the last cycle index.
    pub fn with_max_loops(mut self, max_loops: u32) -> Self {
        self.max_loops = max_loops;
        self
    }

    /// Set the line terminator.
    pub fn with_return_sequence(mut self, sequence: impl Into<Bytes>) -> Self {
        self.return_sequence = sequence.into();
        self
    }
}

/// SSH console login.
///
/// Sending the password ends the routine immediately; nothing waits for a
/// prompt afterwards. Running out of cycles is not an error either: the
/// caller gets [`LoginStatus::Unconfirmed`] and carries on.
#[derive(Debug)]
pub struct ByteLogin {
    host: String,
    credentials: Credentials,
    config: ByteLoginConfig,
    timing: TimingPolicy,
}

impl ByteLogin {
    /// Create a new SSH login.
    pub fn new(
        host: impl Into<String>,
        credentials: Credentials,
        config: ByteLoginConfig,
        timing: TimingPolicy,
    ) -> Self {
        Self {
            host: host.into(),
            credentials,
            config,
            timing,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ByteLoginConfig {
        &self.config
    }
}

impl Authenticator for ByteLogin {
    fn host(&self) -> &str {
        &self.host
    }

    async fn authenticate<C: RawChannel>(
        &self,
        channel: &mut C,
        delay_factor: f64,
    ) -> Result<LoginOutcome> {
        let mut hs = Handshake::new(channel, &self.host, self.timing, delay_factor)?;
        let ret = &self.config.return_sequence;

        for cycle in 0..=self.config.max_loops {
            let fragment = hs.read().await?;

            if fragment.is_empty() {
                // Idle console, poke it
                hs.write(ret).await?;
                hs.pause(self.config.idle_delay).await;
                continue;
            }

            // A password prompt sharing a fragment with the username prompt
            // is answered on a later read
            let mut sent_username = false;
            for (name, recognizer) in self.config.recognizers.matching(&fragment) {
                debug!("{}: {} prompt on cycle {}", self.host, name, cycle);
                match &recognizer.action {
                    LoginAction::SendControl(seq) | LoginAction::SelectMenu(seq) => {
                        hs.write(seq).await?;
                    }
                    LoginAction::SendUsername => {
                        debug!("{}: sending username {}", self.host, self.credentials.username);
                        hs.write(&self.credentials.username_line(ret)).await?;
                        sent_username = true;
                    }
                    LoginAction::SendPassword if sent_username => {}
                    LoginAction::SendPassword => {
                        hs.write(&self.credentials.password_line(ret)).await?;
                        return Ok(hs.finish(LoginStatus::CredentialsSent, cycle.saturating_add(1)));
                    }
                    LoginAction::DeclareSuccess => {
                        return Ok(hs.finish(LoginStatus::PromptConfirmed, cycle.saturating_add(1)));
                    }
                    LoginAction::ContinueWaiting => {}
                }
            }

            hs.pause(self.config.output_delay).await;
        }

        let cycles = exhausted_cycles(self.config.max_loops);
        debug!(
            "{}: no password prompt after {} cycles, continuing unconfirmed",
            self.host, cycles
        );
        Ok(hs.finish(LoginStatus::Unconfirmed, cycles))
    }
}
