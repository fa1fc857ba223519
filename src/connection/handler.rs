// src/connection/handler.rs

//! Defines the `ConnectionHandler` which owns one accepted stream for the
//! whole of its session.

use super::guard::ConnectionGuard;
use crate::core::handler::{RouteOutcome, Router};
use crate::core::protocol::{COMMAND_BUFFER_SIZE, LineTransport, first_line};
use crate::core::repository::AssignmentRepository;
use crate::core::{Command, GraderError};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{Instrument, debug, info, info_span};

/// Runs exactly one protocol cycle on a stream and then closes it.
///
/// The handler takes ownership of the stream, so it is released when `run`
/// returns, whether the session succeeded or failed.
pub struct ConnectionHandler<S> {
    stream: S,
    addr: SocketAddr,
    repository: Arc<AssignmentRepository>,
    session_id: u64,
    read_timeout: Option<Duration>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        addr: SocketAddr,
        repository: Arc<AssignmentRepository>,
        session_id: u64,
        read_timeout: Option<Duration>,
    ) -> Self {
        Self {
            stream,
            addr,
            repository,
            session_id,
            read_timeout,
        }
    }

    /// Reads the command, routes it and closes the stream.
    ///
    /// Returns `Ok(None)` when the client sent nothing but whitespace.
    pub async fn run(self) -> Result<Option<RouteOutcome>, GraderError> {
        let span = info_span!("session", id = self.session_id, peer = %self.addr);
        self.run_session().instrument(span).await
    }

    async fn run_session(self) -> Result<Option<RouteOutcome>, GraderError> {
        let mut guard = ConnectionGuard::new(self.session_id, self.addr);
        let ConnectionHandler {
            mut stream,
            addr,
            repository,
            read_timeout,
            ..
        } = self;

        let line = read_command(&mut stream, read_timeout).await?;
        let Some(command) = Command::parse(&line) else {
            debug!("Blank command from {}, closing.", addr);
            guard.set_completed();
            return Ok(None);
        };
        info!("{}: {}", addr.ip(), line.trim());

        let mut transport = LineTransport::new(stream, read_timeout);
        let outcome = Router::new(&mut transport, &repository)
            .route(command)
            .await?;
        transport.close().await?;

        guard.set_completed();
        Ok(Some(outcome))
    }
}

/// Reads a single buffer from the stream and returns its first line.
/// A command longer than `COMMAND_BUFFER_SIZE` is cut off.
async fn read_command<S>(stream: &mut S, read_timeout: Option<Duration>) -> Result<String, GraderError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = [0u8; COMMAND_BUFFER_SIZE];
    let n = match read_timeout {
        Some(limit) => tokio::time::timeout(limit, stream.read(&mut buf)).await??,
        None => stream.read(&mut buf).await?,
    };
    Ok(first_line(&buf[..n]))
}
