// src/core/protocol/transport.rs

use super::line_codec::{LineCodec, ServerMessage};
use crate::core::GraderError;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;

/// A framed, line-oriented view of a session's stream.
///
/// All replies and all reads of one session go through the same transport,
/// strictly one after another.
pub struct LineTransport<S> {
    framed: Framed<S, LineCodec>,
    read_timeout: Option<Duration>,
}

impl<S> LineTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps `stream`. With `read_timeout` set, every read that takes longer
    /// fails with `GraderError::ReadTimeout`.
    pub fn new(stream: S, read_timeout: Option<Duration>) -> Self {
        Self {
            framed: Framed::new(stream, LineCodec::new()),
            read_timeout,
        }
    }

    /// Writes one message and flushes it.
    pub async fn send(&mut self, message: ServerMessage) -> Result<(), GraderError> {
        self.framed.send(message).await
    }

    /// Buffers one message; it goes out with the next `send` or `close`.
    pub async fn feed(&mut self, message: ServerMessage) -> Result<(), GraderError> {
        self.framed.feed(message).await
    }

    /// Reads the next line. `Ok(None)` means the peer closed the stream.
    pub async fn next_line(&mut self) -> Result<Option<String>, GraderError> {
        let next = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.framed.next()).await?,
            None => self.framed.next().await,
        };
        next.transpose()
    }

    /// Lets a trailing `eof` without CRLF end a read (see `LineCodec`).
    pub fn set_bare_terminator(&mut self, enabled: bool) {
        self.framed.codec_mut().set_bare_terminator(enabled);
    }

    /// Drops inbound bytes that were read but not yet decoded.
    pub fn discard_buffered_input(&mut self) {
        self.framed.read_buffer_mut().clear();
    }

    /// Flushes pending output and shuts down the write half of the stream.
    pub async fn close(&mut self) -> Result<(), GraderError> {
        SinkExt::<ServerMessage>::close(&mut self.framed).await
    }
}
