//! Line-oriented login for consoles reached over Telnet.
//!
//! Telnet carries no authentication, so the username/password exchange is
//! scripted entirely here. Every fragment is kept in a transcript; prompts
//! are found with regexes (case-insensitive for credentials, multi-line for
//! terminators). Success needs an operational prompt. If the loop runs dry
//! one last probe is made in case the session was already logged in.

use bytes::Bytes;
use log::debug;

use super::recognizer::{LoginAction, Recognizer, RecognizerSet, names};
use super::{Authenticator, Credentials, Handshake, LoginOutcome, LoginStatus, exhausted_cycles};
use crate::channel::{Marker, RawChannel};
use crate::config::{PromptSettings, TimingPolicy};
use crate::error::{AuthFailure, ConfigError, Result};

/// Tunables for [`LineLogin`].
#[derive(Debug, Clone)]
pub struct LineLoginConfig {
    /// Recognizers, evaluated in order against every fragment.
    pub recognizers: RecognizerSet,

    /// Read cycles before the final probe.
    pub max_loops: u32,

    /// Line terminator appended to credentials and sent by the probe.
    pub return_sequence: Bytes,

    /// Written before the username to move focus into the field.
    pub focus_sequence: Option<Bytes>,

    /// Ticks to wait before the first read.
    pub settle_delay: f64,

    /// Ticks between the focus sequence and the username.
    pub focus_delay: f64,

    /// Ticks to wait after sending the username.
    pub username_delay: f64,

    /// Ticks to wait after sending the password.
    pub password_delay: f64,

    /// Ticks to wait at the end of each cycle.
    pub poll_delay: f64,

    /// Ticks between the probe write and the probe read.
    pub probe_delay: f64,
}

impl LineLoginConfig {
    /// Create a config with the standard loop bound and intervals.
    pub fn new(recognizers: RecognizerSet) -> Self {
        Self {
            recognizers,
            max_loops: 20,
            return_sequence: Bytes::from_static(b"\r\n"),
            focus_sequence: None,
            settle_delay: 1.0,
            focus_delay: 0.1,
            username_delay: 1.0,
            password_delay: 0.5,
            poll_delay: 0.5,
            probe_delay: 0.5,
        }
    }

    /// Set the read cycle budget.
    pub fn with_max_loops(mut self, max_loops: u32) -> Self {
        self.max_loops = max_loops;
        self
    }

    /// Set the line terminator.
    pub fn with_return_sequence(mut self, sequence: impl Into<Bytes>) -> Self {
        self.return_sequence = sequence.into();
        self
    }

    /// Set the sequence written ahead of the username.
    pub fn with_focus_sequence(mut self, sequence: impl Into<Bytes>) -> Self {
        self.focus_sequence = Some(sequence.into());
        self
    }

    /// Replace the credential and terminator patterns and the loop budget.
    ///
    /// Replaced recognizers keep their position, so quirk handlers that
    /// come first (Ctrl-Y, menus) still run first.
    pub fn with_settings(mut self, settings: &PromptSettings) -> std::result::Result<Self, ConfigError> {
        let set = &mut self.recognizers;
        set.insert(
            names::USERNAME,
            Recognizer::new(
                Marker::credential_prompt(&settings.username_pattern)?,
                LoginAction::SendUsername,
            ),
        );
        set.insert(
            names::PASSWORD,
            Recognizer::new(
                Marker::credential_prompt(&settings.password_pattern)?,
                LoginAction::SendPassword,
            ),
        );
        set.insert(
            names::PRI_PROMPT,
            Recognizer::new(
                Marker::prompt_terminator(&settings.pri_prompt_terminator)?,
                LoginAction::DeclareSuccess,
            ),
        );
        set.insert(
            names::ALT_PROMPT,
            Recognizer::new(
                Marker::prompt_terminator(&settings.alt_prompt_terminator)?,
                LoginAction::DeclareSuccess,
            ),
        );
        self.max_loops = settings.max_loops;
        Ok(self)
    }
}

/// Which credentials have gone out during this attempt.
///
/// Banners get echoed and prompts reappear; each credential is sent at
/// most once per attempt.
#[derive(Debug, Default, Clone, Copy)]
struct HandshakeState {
    sent_user: bool,
    sent_pass: bool,
}

/// Telnet console login.
#[derive(Debug)]
pub struct LineLogin {
    host: String,
    credentials: Credentials,
    config: LineLoginConfig,
    timing: TimingPolicy,
}

impl LineLogin {
    /// Create a new Telnet login.
    pub fn new(
        host: impl Into<String>,
        credentials: Credentials,
        config: LineLoginConfig,
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
    pub fn config(&self) -> &LineLoginConfig {
        &self.config
    }

    /// Answer everything recognized in one fragment.
    ///
    /// All matching recognizers fire, in order. Returns whether an
    /// operational prompt was seen.
    async fn respond<C: RawChannel>(
        &self,
        hs: &mut Handshake<'_, C>,
        state: &mut HandshakeState,
        fragment: &[u8],
    ) -> Result<bool> {
        let ret = &self.config.return_sequence;
        let mut prompt_seen = false;

        for (name, recognizer) in self.config.recognizers.matching(fragment) {
            match &recognizer.action {
                LoginAction::SendControl(seq) | LoginAction::SelectMenu(seq) => {
                    debug!("{}: answering {} prompt", self.host, name);
                    hs.write(seq).await?;
                }
                LoginAction::SendUsername if !state.sent_user => {
                    debug!("{}: sending username {}", self.host, self.credentials.username);
                    state.sent_user = true;
                    if let Some(focus) = &self.config.focus_sequence {
                        hs.write(focus).await?;
                        hs.pause(self.config.focus_delay).await;
                    }
                    hs.write(&self.credentials.username_line(ret)).await?;
                    hs.pause(self.config.username_delay).await;
                }
                LoginAction::SendPassword if !state.sent_pass => {
                    debug!("{}: sending password", self.host);
                    state.sent_pass = true;
                    hs.write(&self.credentials.password_line(ret)).await?;
                    hs.pause(self.config.password_delay).await;
                }
                LoginAction::SendUsername | LoginAction::SendPassword => {
                    debug!("{}: {} prompt again, already answered", self.host, name);
                }
                LoginAction::DeclareSuccess => prompt_seen = true,
                LoginAction::ContinueWaiting => {}
            }
        }

        Ok(prompt_seen)
    }
}

impl Authenticator for LineLogin {
    fn host(&self) -> &str {
        &self.host
    }

    async fn authenticate<C: RawChannel>(
        &self,
        channel: &mut C,
        delay_factor: f64,
    ) -> Result<LoginOutcome> {
        let mut hs = Handshake::new(channel, &self.host, self.timing, delay_factor)?.recording();
        let mut state = HandshakeState::default();

        hs.pause(self.config.settle_delay).await;

        for cycle in 1..=self.config.max_loops {
            let fragment = hs.read().await?;
            if self.respond(&mut hs, &mut state, &fragment).await? {
                return Ok(hs.finish(LoginStatus::PromptConfirmed, cycle));
            }
            hs.pause(self.config.poll_delay).await;
        }

        // Last try: the session may have been logged in before we started
        let cycles = exhausted_cycles(self.config.max_loops);
        debug!("{}: loop exhausted, probing for a prompt", self.host);
        hs.write(&self.config.return_sequence).await?;
        hs.pause(self.config.probe_delay).await;
        let fragment = hs.read().await?;
        if self.config.recognizers.declares_success(&fragment) {
            return Ok(hs.finish(LoginStatus::PromptConfirmed, cycles));
        }

        Err(hs.fail(AuthFailure::Timeout { cycles }).await)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::channel::ScriptedChannel;
    use crate::error::Error;
    use crate::login::assert_elapsed;
    use crate::platform::vendors::{extreme_ers, generic};

    fn ers_login(max_loops: u32) -> LineLogin {
        LineLogin::new(
            "ers-4850",
            Credentials::new("admin", "secret"),
            extreme_ers::telnet_config().with_max_loops(max_loops),
            TimingPolicy::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_username_password_prompt() {
        let login = ers_login(20);
        let mut channel =
            ScriptedChannel::from_fragments(["Enter Username:", "Enter Password:", "switch#"]);

        let outcome = login.authenticate(&mut channel, 1.0).await.unwrap();

        assert_eq!(outcome.status, LoginStatus::PromptConfirmed);
        assert_eq!(outcome.cycles, 3);
        assert_eq!(
            outcome.transcript(),
            Some("Enter Username:Enter Password:switch#")
        );
        assert_eq!(
            channel.writes(),
            &[
                b"\t".to_vec(),
                b"admin\r\n".to_vec(),
                b"secret\r\n".to_vec()
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_username_sent_once() {
        let login = ers_login(20);
        let mut channel = ScriptedChannel::from_fragments([
            "Enter Username:",
            "\r\nEnter Username:",
            "ENTER USERNAME:",
            "Enter Password:",
            "Enter Password:",
            "switch>",
        ]);

        login.authenticate(&mut channel, 1.0).await.unwrap();

        let usernames = channel
            .writes()
            .iter()
            .filter(|w| w.as_slice() == b"admin\r\n")
            .count();
        let passwords = channel
            .writes()
            .iter()
            .filter(|w| w.as_slice() == b"secret\r\n")
            .count();
        assert_eq!(usernames, 1);
        assert_eq!(passwords, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_password_only_console() {
        let login = LineLogin::new(
            "ers-4850",
            Credentials::new("admin", ""),
            extreme_ers::telnet_config(),
            TimingPolicy::default(),
        );
        let mut channel = ScriptedChannel::from_fragments(["Enter Password:", "switch#"]);

        let outcome = login.authenticate(&mut channel, 1.0).await.unwrap();

        assert_eq!(outcome.status, LoginStatus::PromptConfirmed);
        assert_eq!(outcome.cycles, 2);
        assert_eq!(outcome.transcript(), Some("Enter Password:switch#"));
        assert_eq!(channel.writes(), &[b"\r\n".to_vec()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_ends_login_without_writes() {
        let login = ers_login(20);
        let mut channel = ScriptedChannel::from_fragments(["\r\nswitch# "]);

        let outcome = login.authenticate(&mut channel, 1.0).await.unwrap();

        assert_eq!(outcome.cycles, 1);
        assert!(channel.writes().is_empty());
        assert_eq!(channel.reads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ctrl_y_answered_first() {
        let login = ers_login(20);
        let mut channel =
            ScriptedChannel::from_fragments(["Enter Ctrl-Y to begin.\r\nEnter Username:", "switch>"]);

        login.authenticate(&mut channel, 1.0).await.unwrap();

        assert_eq!(channel.writes()[0], b"\x19\n");
        assert_eq!(channel.writes()[1], b"\t");
    }

    #[tokio::test(start_paused = true)]
    async fn test_menu_is_bypassed() {
        let login = ers_login(20);
        let mut channel = ScriptedChannel::from_fragments([
            "Main Menu\r\nUse arrow keys to highlight option, press <Return> or <Enter> to select option.",
            "switch#",
        ]);

        login.authenticate(&mut channel, 1.0).await.unwrap();

        assert_eq!(channel.writes(), &[b"c\n".to_vec()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_success_on_probe() {
        let login = ers_login(20);
        let mut channel = ScriptedChannel::new().idle_for(20).output("switch>");

        let outcome = login.authenticate(&mut channel, 1.0).await.unwrap();

        assert_eq!(outcome.status, LoginStatus::PromptConfirmed);
        assert_eq!(outcome.cycles, 21);
        assert_eq!(outcome.transcript(), Some("switch>"));
        assert_eq!(channel.reads(), 21);
        assert_eq!(channel.writes(), &[b"\r\n".to_vec()]);
        assert!(!channel.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_fails_and_closes() {
        let login = ers_login(5);
        let mut channel = ScriptedChannel::from_fragments(["Booting..."]);

        let start = tokio::time::Instant::now();
        let err = login.authenticate(&mut channel, 1.0).await.unwrap_err();

        match err {
            Error::Authentication(auth) => {
                assert_eq!(auth.host, "ers-4850");
                assert_eq!(auth.kind, AuthFailure::Timeout { cycles: 6 });
                assert_eq!(auth.transcript, "Booting...");
                assert_eq!(auth.to_string(), "Login failed: ers-4850 (no prompt after 6 read cycles)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(channel.reads(), 6);
        assert_eq!(channel.close_count(), 1);
        // settle 1 + five polls of 0.5 + probe 0.5
        assert_elapsed(start, Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_failure_on_fifth_cycle() {
        let login = ers_login(20);
        let mut channel = ScriptedChannel::new().idle_for(4).eof();

        let err = login.authenticate(&mut channel, 1.0).await.unwrap_err();

        match err {
            Error::Authentication(auth) => {
                assert_eq!(auth.host, "ers-4850");
                assert_eq!(auth.kind, AuthFailure::ChannelClosed);
                assert!(auth.transcript.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(channel.reads(), 5);
        assert_eq!(channel.close_count(), 1);
        assert!(channel.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_loop_setting() {
        let login = ers_login(u32::MAX);
        let mut channel = ScriptedChannel::from_fragments(["Enter Password:", "switch#"]);

        let outcome = login.authenticate(&mut channel, 1.0).await.unwrap();

        assert_eq!(outcome.cycles, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_factor_stretches_waits() {
        let login = ers_login(20);
        let mut channel = ScriptedChannel::from_fragments(["Enter Username:", "switch#"]);

        let start = tokio::time::Instant::now();
        login.authenticate(&mut channel, 2.0).await.unwrap();

        // settle 1 + focus 0.1 + username 1 + poll 0.5, all doubled
        assert_elapsed(start, Duration::from_millis(5200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generic_profile_has_no_quirks() {
        let login = LineLogin::new(
            "linux-box",
            Credentials::new("admin", "secret"),
            generic::telnet_config(),
            TimingPolicy::default(),
        );
        let mut channel = ScriptedChannel::from_fragments([
            "Enter Ctrl-Y to begin.\r\nlogin: ",
            "Password: ",
            "admin@box:~# ",
        ]);

        login.authenticate(&mut channel, 1.0).await.unwrap();

        assert_eq!(
            channel.writes(),
            &[b"admin\r\n".to_vec(), b"secret\r\n".to_vec()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_override_patterns() {
        let settings = PromptSettings {
            username_pattern: r"login as".to_string(),
            pri_prompt_terminator: r"\$\s*$".to_string(),
            max_loops: 3,
            ..Default::default()
        };
        let config = extreme_ers::telnet_config().with_settings(&settings).unwrap();
        assert_eq!(config.max_loops, 3);

        let login = LineLogin::new(
            "sw",
            Credentials::new("admin", "secret"),
            config,
            TimingPolicy::default(),
        );
        let mut channel = ScriptedChannel::from_fragments(["LOGIN AS:", "user$ "]);

        let outcome = login.authenticate(&mut channel, 1.0).await.unwrap();

        assert_eq!(outcome.cycles, 2);
        assert_eq!(channel.writes()[1], b"admin\r\n");
    }

    #[test]
    fn test_invalid_settings_pattern() {
        let settings = PromptSettings {
            password_pattern: r"(unclosed".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            extreme_ers::telnet_config().with_settings(&settings),
            Err(ConfigError::InvalidPattern(_))
        ));
    }
}
