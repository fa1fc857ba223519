// src/core/protocol/line_codec.rs

//! Implements the line framing and the corresponding `Encoder` and `Decoder`
//! for network communication.

use crate::core::GraderError;
use crate::core::grading::Verdict;
use bytes::{Buf, BytesMut};
use std::fmt;
use tokio_util::codec::{Decoder, Encoder};

/// Every line on the wire, in both directions, ends with CRLF.
const CRLF: &[u8] = b"\r\n";
const CRLF_LEN: usize = 2;

/// Upper bound for a single inbound line. A client that streams more than
/// this without a CRLF is dropped.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

pub(crate) const PONG: &str = "PONG!";
pub(crate) const INVALID_COMMAND: &str = "INVALID COMMAND OR ASSIGNMENT";
pub(crate) const END_MARKER: &str = "EOF";

/// A single line sent from the server to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Reply to `ping`.
    Pong,
    /// The requested assignment does not exist.
    InvalidAssignment,
    /// Free text: an assignment name or one line of test input.
    Line(String),
    /// Terminates a directory listing or a block of test input.
    End,
    /// Number of test cases that are about to run.
    Count(usize),
    /// Outcome of one test case.
    Verdict(Verdict),
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Pong => f.write_str(PONG),
            ServerMessage::InvalidAssignment => f.write_str(INVALID_COMMAND),
            ServerMessage::Line(s) => f.write_str(s),
            ServerMessage::End => f.write_str(END_MARKER),
            ServerMessage::Count(n) => write!(f, "{n}"),
            ServerMessage::Verdict(v) => write!(f, "{v}"),
        }
    }
}

/// Splits inbound bytes on CRLF and encodes outbound `ServerMessage`s.
///
/// Partial lines are buffered until their CRLF arrives, so a line spread
/// over several TCP segments is delivered once, whole.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// How far into the buffer the previous call already searched.
    next_index: usize,
    /// Accept a buffered `eof` without its CRLF as a complete line.
    bare_terminator: bool,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// While enabled, a pending partial line that is exactly `eof` (any case)
    /// is returned at once instead of waiting for its CRLF.
    pub fn set_bare_terminator(&mut self, enabled: bool) {
        self.bare_terminator = enabled;
    }
}

impl Encoder<ServerMessage> for LineCodec {
    type Error = GraderError;

    fn encode(&mut self, item: ServerMessage, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let text = item.to_string();
        dst.reserve(text.len() + CRLF_LEN);
        dst.extend_from_slice(text.as_bytes());
        dst.extend_from_slice(CRLF);
        Ok(())
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = GraderError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Step back one byte: the CR may have been the last byte of the previous scan.
        let start = self.next_index.saturating_sub(1).min(src.len());
        match src[start..].windows(CRLF_LEN).position(|w| w == CRLF) {
            Some(offset) => {
                let end = start + offset;
                self.next_index = 0;
                if end > MAX_LINE_LENGTH {
                    return Err(GraderError::LineTooLong(MAX_LINE_LENGTH));
                }
                let line = src.split_to(end);
                src.advance(CRLF_LEN);
                Ok(Some(String::from_utf8_lossy(&line).into_owned()))
            }
            None => {
                if src.len() > MAX_LINE_LENGTH + 1 {
                    return Err(GraderError::LineTooLong(MAX_LINE_LENGTH));
                }
                if self.bare_terminator && src.eq_ignore_ascii_case(END_MARKER.as_bytes()) {
                    self.next_index = 0;
                    let line = src.split();
                    return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
                }
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    /// An unterminated trailing line is still a line when the peer closes.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        self.next_index = 0;
        let rest = src.split();
        Ok(Some(String::from_utf8_lossy(&rest).into_owned()))
    }
}
