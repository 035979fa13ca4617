//! Login profile: everything vendor-specific about a console login.

use crate::login::{ByteLoginConfig, LineLoginConfig};

/// Vendor login profile.
///
/// Holds one configuration per transport so that quirks (Ctrl-Y banners,
/// menu screens, tab-to-focus) stay with the vendor that needs them.
#[derive(Debug, Clone)]
pub struct LoginProfile {
    /// Platform name (e.g., "extreme_ers", "generic").
    pub name: String,

    /// SSH login configuration.
    pub ssh: ByteLoginConfig,

    /// Telnet login configuration.
    pub telnet: LineLoginConfig,
}

impl LoginProfile {
    /// Create a new profile.
    pub fn new(name: impl Into<String>, ssh: ByteLoginConfig, telnet: LineLoginConfig) -> Self {
        Self {
            name: name.into(),
            ssh,
            telnet,
        }
    }

    /// Replace the SSH configuration.
    pub fn with_ssh(mut self, ssh: ByteLoginConfig) -> Self {
        self.ssh = ssh;
        self
    }

    /// Replace the Telnet configuration.
    pub fn with_telnet(mut self, telnet: LineLoginConfig) -> Self {
        self.telnet = telnet;
        self
    }
}
