//! Generic login profile.
//!
//! Plain username/password consoles with no vendor quirks: no Ctrl-Y
//! challenge, no menu, no tab before the username.

use crate::channel::Marker;
use crate::config::PromptSettings;
use crate::login::{ByteLoginConfig, LineLoginConfig, LoginAction, Recognizer, RecognizerSet, names};
use crate::platform::LoginProfile;

/// Platform name used for lookup.
pub const PLATFORM_NAME: &str = "generic";

/// Create the generic login profile.
pub fn profile() -> LoginProfile {
    LoginProfile::new(PLATFORM_NAME, ssh_config(), telnet_config())
}

/// SSH recognizers: credential prompts only.
pub fn ssh_config() -> ByteLoginConfig {
    let recognizers = RecognizerSet::new()
        .with(
            names::USERNAME,
            Recognizer::new(Marker::literal("sername"), LoginAction::SendUsername),
        )
        .with(
            names::PASSWORD,
            Recognizer::new(Marker::literal("ssword"), LoginAction::SendPassword),
        );

    ByteLoginConfig::new(recognizers)
}

/// Prompt patterns covering the usual `login:` / `Username:` / `Password:`.
pub fn prompt_settings() -> PromptSettings {
    PromptSettings {
        username_pattern: r"(?:user:|username|login|user name)".to_string(),
        password_pattern: r"assword".to_string(),
        ..Default::default()
    }
}

/// Telnet recognizers: credential prompts and prompt terminators only.
pub fn telnet_config() -> LineLoginConfig {
    LineLoginConfig::new(RecognizerSet::new())
        .with_settings(&prompt_settings())
        .unwrap()
}
