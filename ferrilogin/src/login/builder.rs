//! Builder for creating console logins.

use super::ssh::ByteLogin;
use super::telnet::LineLogin;
use super::{Authenticator, Credentials, LoginOutcome};
use crate::channel::RawChannel;
use crate::config::{PromptSettings, TimingPolicy, check_delay_factor};
use crate::error::{ConfigError, Result};
use crate::platform::{self, LoginProfile};

/// Transport the console is reached over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// SSH: byte-oriented login, lenient on exhaustion.
    #[default]
    Ssh,

    /// Telnet: scripted line-oriented login.
    Telnet,
}

/// Builder for constructing console logins.
///
/// # Example
///
/// ```rust,no_run
/// use ferrilogin::{Authenticator, LoginBuilder, Transport};
/// use ferrilogin::channel::ScriptedChannel;
///
/// # async fn example() -> Result<(), ferrilogin::Error> {
/// let login = LoginBuilder::new("192.168.1.10")
///     .username("admin")
///     .password("secret")
///     .platform("extreme_ers")
///     .transport(Transport::Telnet)
///     .build()?;
///
/// let mut channel = ScriptedChannel::from_fragments(["Enter Username:", "Enter Password:", "ERS#"]);
/// let outcome = login.authenticate(&mut channel, 1.0).await?;
/// println!("{}", outcome.transcript().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct LoginBuilder {
    host: String,
    username: Option<String>,
    password: String,
    transport: Transport,
    platform_name: Option<String>,
    custom_profile: Option<LoginProfile>,
    timing: TimingPolicy,
    prompt_settings: Option<PromptSettings>,
    max_loops: Option<u32>,
}

impl LoginBuilder {
    /// Create a new login builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: None,
            password: String::new(),
            transport: Transport::default(),
            platform_name: None,
            custom_profile: None,
            timing: TimingPolicy::default(),
            prompt_settings: None,
            max_loops: None,
        }
    }

    /// Set the username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password (default: empty).
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the transport (default: SSH).
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Set the platform name (e.g., "extreme_ers", "generic").
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform_name = Some(platform.into());
        self
    }

    /// Set a custom login profile.
    pub fn custom_profile(mut self, profile: LoginProfile) -> Self {
        self.custom_profile = Some(profile);
        self
    }

    /// Set the timing policy.
    pub fn timing(mut self, timing: TimingPolicy) -> Self {
        self.timing = timing;
        self
    }

    /// Set the connection-wide delay factor.
    pub fn global_delay_factor(mut self, factor: f64) -> Self {
        self.timing.global_delay_factor = factor;
        self
    }

    /// Override the Telnet prompt patterns.
    pub fn prompt_settings(mut self, settings: PromptSettings) -> Self {
        self.prompt_settings = Some(settings);
        self
    }

    /// Override the loop bound for the selected transport.
    pub fn max_loops(mut self, max_loops: u32) -> Self {
        self.max_loops = Some(max_loops);
        self
    }

    /// Build the login.
    ///
    /// Nothing is read or written until `authenticate` is called.
    pub fn build(self) -> Result<Login> {
        let username = self.username.ok_or(ConfigError::MissingUsername)?;
        check_delay_factor(self.timing.global_delay_factor)?;

        let profile = if let Some(custom) = self.custom_profile {
            custom
        } else if let Some(name) = self.platform_name {
            platform::profile(&name).ok_or(ConfigError::UnknownPlatform { name })?
        } else {
            return Err(ConfigError::MissingPlatform.into());
        };

        let credentials = Credentials::new(username, self.password);

        let login = match self.transport {
            Transport::Ssh => {
                let mut config = profile.ssh;
                if let Some(max_loops) = self.max_loops {
                    config.max_loops = max_loops;
                }
                Login::Ssh(ByteLogin::new(self.host, credentials, config, self.timing))
            }
            Transport::Telnet => {
                let mut config = profile.telnet;
                if let Some(settings) = &self.prompt_settings {
                    config = config.with_settings(settings)?;
                }
                if let Some(max_loops) = self.max_loops {
                    config.max_loops = max_loops;
                }
                Login::Telnet(LineLogin::new(self.host, credentials, config, self.timing))
            }
        };

        Ok(login)
    }
}

/// A login for either transport.
#[derive(Debug)]
pub enum Login {
    /// SSH console login.
    Ssh(ByteLogin),

    /// Telnet console login.
    Telnet(LineLogin),
}

impl Login {
    /// Transport this login was built for.
    pub fn transport(&self) -> Transport {
        match self {
            Login::Ssh(_) => Transport::Ssh,
            Login::Telnet(_) => Transport::Telnet,
        }
    }
}

impl Authenticator for Login {
    fn host(&self) -> &str {
        match self {
            Login::Ssh(login) => login.host(),
            Login::Telnet(login) => login.host(),
        }
    }

    async fn authenticate<C: RawChannel>(
        &self,
        channel: &mut C,
        delay_factor: f64,
    ) -> Result<LoginOutcome> {
        match self {
            Login::Ssh(login) => login.authenticate(channel, delay_factor).await,
            Login::Telnet(login) => login.authenticate(channel, delay_factor).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ScriptedChannel;
    use crate::error::Error;
    use crate::login::LoginStatus;

    #[test]
    fn test_username_required() {
        let result = LoginBuilder::new("sw1").platform("extreme_ers").build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingUsername))
        ));
    }

    #[test]
    fn test_platform_required() {
        let result = LoginBuilder::new("sw1").username("admin").build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingPlatform))
        ));
    }

    #[test]
    fn test_unknown_platform() {
        let result = LoginBuilder::new("sw1")
            .username("admin")
            .platform("cisco_ios")
            .build();
        match result {
            Err(Error::Config(ConfigError::UnknownPlatform { name })) => {
                assert_eq!(name, "cisco_ios")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_global_delay_factor() {
        let result = LoginBuilder::new("sw1")
            .username("admin")
            .platform("extreme_ers")
            .global_delay_factor(f64::NAN)
            .build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidDelayFactor(_)))
        ));
    }

    #[test]
    fn test_overrides_apply_to_selected_transport() {
        let login = LoginBuilder::new("sw1")
            .username("admin")
            .platform("extreme_ers")
            .transport(Transport::Telnet)
            .prompt_settings(PromptSettings {
                max_loops: 7,
                ..Default::default()
            })
            .max_loops(9)
            .build()
            .unwrap();

        assert_eq!(login.transport(), Transport::Telnet);
        assert_eq!(login.host(), "sw1");
        match login {
            Login::Telnet(telnet) => assert_eq!(telnet.config().max_loops, 9),
            other => panic!("unexpected login: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_transport_is_ssh() {
        let login = LoginBuilder::new("sw1")
            .username("admin")
            .password("secret")
            .platform("extreme_ers")
            .build()
            .unwrap();
        assert_eq!(login.transport(), Transport::Ssh);

        let mut channel = ScriptedChannel::from_fragments(["Password:"]);
        let outcome = login.authenticate(&mut channel, 1.0).await.unwrap();
        assert_eq!(outcome.status, LoginStatus::CredentialsSent);
        assert_eq!(channel.writes(), &[b"secret\n".to_vec()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_delay_factor_wins_when_larger() {
        let login = LoginBuilder::new("sw1")
            .username("admin")
            .platform("extreme_ers")
            .global_delay_factor(3.0)
            .build()
            .unwrap();

        let mut channel = ScriptedChannel::new().idle().output("Password:");
        let start = tokio::time::Instant::now();
        login.authenticate(&mut channel, 1.0).await.unwrap();
        crate::login::assert_elapsed(start, std::time::Duration::from_secs(3));
    }
}
