//! Extreme Ethernet Routing Switch (ERS) login profile.
//!
//! ERS consoles open with a Ctrl-Y challenge before anything else:
//!
//! ```text
//! Enter Ctrl-Y to begin.
//! ```
//!
//! Over Telnet they may then show a menu instead of a CLI, ask for a
//! username and password (or only a password), and some firmware only
//! accepts the username after a tab moves focus into the field.
//!
//! ```text
//! Enter Username: admin
//! Enter Password: ********
//! ERS-5520-48T#
//! ```

use bytes::Bytes;

use crate::channel::Marker;
use crate::config::PromptSettings;
use crate::login::{
    ByteLoginConfig, LineLoginConfig, LoginAction, Recognizer, RecognizerSet, names,
};
use crate::platform::LoginProfile;

/// Platform name used for lookup.
pub const PLATFORM_NAME: &str = "extreme_ers";

/// Ctrl-Y, the begin-session byte.
pub const CTRL_Y: u8 = 0x19;

/// Create the Extreme ERS login profile.
pub fn profile() -> LoginProfile {
    LoginProfile::new(PLATFORM_NAME, ssh_config(), telnet_config())
}

/// SSH recognizers: plain substrings, judged per fragment.
pub fn ssh_config() -> ByteLoginConfig {
    let recognizers = RecognizerSet::new()
        .with(
            names::BEGIN_SESSION,
            Recognizer::new(
                Marker::literal("Ctrl-Y"),
                LoginAction::SendControl(Bytes::from_static(&[CTRL_Y])),
            ),
        )
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

/// Telnet recognizers.
///
/// The Ctrl-Y and menu answers end in a bare `\n`, not the Telnet return;
/// that is what every tested ERS 5510/5520 firmware accepts.
pub fn telnet_config() -> LineLoginConfig {
    let recognizers = RecognizerSet::new()
        .with(
            names::BEGIN_SESSION,
            Recognizer::new(
                Marker::literal("Ctrl-Y"),
                LoginAction::SendControl(Bytes::from_static(b"\x19\n")),
            ),
        )
        .with(
            names::MENU,
            Recognizer::new(
                Marker::literal("Use arrow keys to highlight option"),
                LoginAction::SelectMenu(Bytes::from_static(b"c\n")),
            ),
        );

    LineLoginConfig::new(recognizers)
        .with_focus_sequence(Bytes::from_static(b"\t"))
        .with_settings(&PromptSettings::default())
        .unwrap()
}
