// src/core/errors.rs

//! Defines the primary error type for grading sessions.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Every failure that can end a grading session early.
///
/// None of these are reported to the client: the session is dropped and the
/// stream closed. Unknown assignments and wrong answers are not errors at all,
/// they are ordinary protocol replies.
#[derive(Error, Debug, Clone)]
pub enum GraderError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Connection closed by peer before the response was complete")]
    ConnectionClosed,

    #[error("Line exceeds the maximum length of {0} bytes")]
    LineTooLong(usize),

    /// `in.txt` or `out.txt` of a test case could not be read.
    #[error("Cannot read test file '{}': {source}", path.display())]
    MissingTestFile {
        path: PathBuf,
        source: Arc<std::io::Error>,
    },

    #[error("Timed out waiting for the client")]
    ReadTimeout,
}

impl GraderError {
    /// Wraps an I/O failure on one of a test case's files.
    pub fn missing_test_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraderError::MissingTestFile {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Returns true when the error only means the client went away.
    pub fn is_disconnect(&self) -> bool {
        match self {
            GraderError::ConnectionClosed => true,
            GraderError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

impl PartialEq for GraderError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GraderError::Io(e1), GraderError::Io(e2)) => e1.kind() == e2.kind(),
            (GraderError::LineTooLong(a), GraderError::LineTooLong(b)) => a == b,
            (
                GraderError::MissingTestFile { path: p1, .. },
                GraderError::MissingTestFile { path: p2, .. },
            ) => p1 == p2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl From<std::io::Error> for GraderError {
    fn from(e: std::io::Error) -> Self {
        GraderError::Io(Arc::new(e))
    }
}

impl From<tokio::time::error::Elapsed> for GraderError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        GraderError::ReadTimeout
    }
}
