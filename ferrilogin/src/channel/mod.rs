//! Channel layer: the raw byte channel the login automaton talks to.
//!
//! The automaton never connects anything itself. It borrows a channel that
//! is already sitting at the device's login banner and only ever reads what
//! is available right now, writes raw bytes, and closes the channel when a
//! login fails.

mod buffer;
mod io;
mod patterns;
pub mod scripted;

pub use buffer::Transcript;
pub use io::IoChannel;
pub use patterns::{Marker, PromptMatcher};
pub use scripted::ScriptedChannel;

use std::future::Future;

use bytes::Bytes;

use crate::error::ChannelError;

/// Unframed byte channel to a device console.
pub trait RawChannel: Send {
    /// Return whatever output is available without waiting for more.
    ///
    /// An empty fragment means the device has nothing to say right now.
    /// `Err(ChannelError::Closed)` means the stream has ended.
    fn read_nonblocking(
        &mut self,
    ) -> impl Future<Output = Result<Bytes, ChannelError>> + Send;

    /// Send raw bytes. No framing is added.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Close the channel. Called by the automaton on a failed login.
    fn close(&mut self) -> impl Future<Output = Result<(), ChannelError>> + Send;
}
