// src/core/protocol/mod.rs

//! The CRLF line protocol spoken between the grading server and its clients.

pub mod line_codec;
pub mod transport;

pub use line_codec::{LineCodec, MAX_LINE_LENGTH, ServerMessage};
pub use transport::LineTransport;

/// The size of the single read used to receive a session's command.
/// Anything past this many bytes is never seen by the server.
pub const COMMAND_BUFFER_SIZE: usize = 4096;

/// Extracts the first CRLF-terminated line of a raw command buffer.
///
/// Without a CRLF the whole buffer is the line. Bytes after the first CRLF
/// are discarded.
pub fn first_line(buf: &[u8]) -> String {
    let end = buf
        .windows(2)
        .position(|w| w == b"\r\n")
        .unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}
