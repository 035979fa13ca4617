//! `RawChannel` adapter for tokio byte streams.
//!
//! Wraps anything that is `AsyncRead + AsyncWrite` (a russh `ChannelStream`,
//! a `TcpStream` carrying Telnet, a serial port) so the login automaton can
//! poll it without blocking.

use bytes::{Bytes, BytesMut};
use futures_util::FutureExt;
use log::trace;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::RawChannel;
use crate::error::ChannelError;

/// Default read chunk size.
const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Non-blocking channel over an async byte stream.
pub struct IoChannel<S> {
    /// The underlying stream.
    stream: S,

    /// Scratch buffer for each read call.
    chunk_size: usize,

    /// Set once the stream reports end-of-file.
    eof: bool,
}

impl<S> IoChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            chunk_size: DEFAULT_CHUNK_SIZE,
            eof: false,
        }
    }

    /// Set the size of each underlying read.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Whether end-of-file has been seen.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Get a reference to the wrapped stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Unwrap, returning the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S> RawChannel for IoChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Drains everything that is ready. Data seen just before end-of-file
    /// is returned first; the next call reports `Closed`.
    async fn read_nonblocking(&mut self) -> Result<Bytes, ChannelError> {
        if self.eof {
            return Err(ChannelError::Closed);
        }

        let mut collected = BytesMut::new();
        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            match self.stream.read(&mut chunk).now_or_never() {
                // Nothing ready
                None => break,
                Some(Ok(0)) => {
                    self.eof = true;
                    if collected.is_empty() {
                        return Err(ChannelError::Closed);
                    }
                    break;
                }
                Some(Ok(n)) => collected.extend_from_slice(&chunk[..n]),
                Some(Err(e)) => return Err(ChannelError::Io(e)),
            }
        }

        trace!("read {} bytes", collected.len());
        Ok(collected.freeze())
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), ChannelError> {
        if self.eof {
            return Err(ChannelError::Closed);
        }
        self.stream.write_all(data).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        self.eof = true;
        self.stream.shutdown().await?;
        Ok(())
    }
}
