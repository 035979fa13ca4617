//! In-memory channel that replays a fixed script of device output.
//!
//! Useful for testing login profiles against captured console sessions
//! without a device. Each read consumes one scripted step; once the script
//! runs out every read returns an empty fragment.
//!
//! # Example
//!
//! ```rust
//! use ferrilogin::channel::{RawChannel, ScriptedChannel};
//!
//! # async fn example() -> Result<(), ferrilogin::error::ChannelError> {
//! let mut channel = ScriptedChannel::new()
//!     .output("Enter Username:")
//!     .idle()
//!     .eof();
//!
//! let first = channel.read_nonblocking().await?;
//! assert_eq!(&first[..], b"Enter Username:");
//! channel.write(b"admin\r\n").await?;
//! assert_eq!(channel.writes(), &[b"admin\r\n".to_vec()]);
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;

use bytes::Bytes;

use super::RawChannel;
use crate::error::ChannelError;

/// One scripted read result.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// The read returns these bytes (possibly empty).
    Output(Bytes),

    /// The read fails with end-of-stream.
    Eof,
}

/// Scripted channel recording everything written to it.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    script: VecDeque<ScriptStep>,
    writes: Vec<Vec<u8>>,
    reads: u32,
    close_count: u32,
    closed: bool,
}

impl ScriptedChannel {
    /// Create a channel with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a channel that returns each fragment in turn.
    pub fn from_fragments<I, T>(fragments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        fragments
            .into_iter()
            .fold(Self::new(), |channel, fragment| channel.output(fragment))
    }

    /// Queue a read that returns `data`.
    pub fn output(mut self, data: impl AsRef<[u8]>) -> Self {
        self.script
            .push_back(ScriptStep::Output(Bytes::copy_from_slice(data.as_ref())));
        self
    }

    /// Queue a read that returns nothing.
    pub fn idle(self) -> Self {
        self.output(b"")
    }

    /// Queue `count` empty reads.
    pub fn idle_for(self, count: usize) -> Self {
        (0..count).fold(self, |channel, _| channel.idle())
    }

    /// Queue an end-of-stream failure.
    pub fn eof(mut self) -> Self {
        self.script.push_back(ScriptStep::Eof);
        self
    }

    /// Every write, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Number of read calls made so far.
    pub fn reads(&self) -> u32 {
        self.reads
    }

    /// Number of times `close` was called.
    pub fn close_count(&self) -> u32 {
        self.close_count
    }

    /// Whether the channel has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Scripted steps not consumed yet.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RawChannel for ScriptedChannel {
    async fn read_nonblocking(&mut self) -> Result<Bytes, ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.reads += 1;
        match self.script.pop_front() {
            Some(ScriptStep::Output(data)) => Ok(data),
            Some(ScriptStep::Eof) => Err(ChannelError::Closed),
            None => Ok(Bytes::new()),
        }
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.writes.push(data.to_vec());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        self.close_count += 1;
        self.closed = true;
        Ok(())
    }
}
