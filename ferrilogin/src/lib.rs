//! # Ferrilogin
//!
//! Async login handshake automaton for network device consoles.
//!
//! Some consoles keep asking questions after the transport is up: an
//! Extreme ERS prints "Enter Ctrl-Y to begin.", may show a menu, and over
//! Telnet (which has no authentication of its own) wants a scripted
//! username/password exchange. Ferrilogin recognizes those prompts in raw
//! channel output, answers them, and tells you when you are sitting at an
//! operational prompt.
//!
//! ## Features
//!
//! - Byte-oriented SSH login that reacts to partial output fragments
//! - Line-oriented Telnet login with transcript capture and a final probe
//!   for sessions that were already logged in
//! - Vendor profiles keeping device quirks isolated (Extreme ERS, generic)
//! - Delay factor scaling every built-in wait for slow devices
//! - Works over any tokio `AsyncRead + AsyncWrite` stream
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ferrilogin::{Authenticator, LoginBuilder, Transport};
//! use ferrilogin::channel::IoChannel;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stream = tokio::net::TcpStream::connect("192.168.1.10:23").await?;
//!     let mut channel = IoChannel::new(stream);
//!
//!     let login = LoginBuilder::new("192.168.1.10")
//!         .username("admin")
//!         .password("secret")
//!         .platform("extreme_ers")
//!         .transport(Transport::Telnet)
//!         .build()?;
//!
//!     let outcome = login.authenticate(&mut channel, 1.0).await?;
//!     println!("{}", outcome.transcript().unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod login;
pub mod platform;

// Re-export main types for convenience
pub use channel::{IoChannel, RawChannel, ScriptedChannel};
pub use config::{PromptSettings, TimingPolicy};
pub use error::{AuthFailure, AuthenticationError, Error};
pub use login::{
    Authenticator, ByteLogin, Credentials, LineLogin, Login, LoginBuilder, LoginOutcome,
    LoginStatus, Transport,
};
pub use platform::LoginProfile;
