// src/core/handler/command_router.rs

//! Routes a parsed `Command` to the directory listing, the ping reply or an
//! assignment run, writing every reply to the session's transport.

use crate::core::GraderError;
use crate::core::command::Command;
use crate::core::grading::{TestCaseRunner, Verdict};
use crate::core::metrics;
use crate::core::protocol::{LineTransport, ServerMessage};
use crate::core::repository::AssignmentRepository;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

/// What a routed command ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// `PONG!` was sent.
    Pong,
    /// This many assignment names were listed.
    Listed(usize),
    /// The assignment did not exist.
    InvalidAssignment,
    /// Every test case of the assignment ran; one verdict per test case.
    Graded(Vec<Verdict>),
}

/// Executes one command against the repository for one session.
pub struct Router<'a, S> {
    transport: &'a mut LineTransport<S>,
    repository: &'a AssignmentRepository,
}

impl<'a, S> Router<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(transport: &'a mut LineTransport<S>, repository: &'a AssignmentRepository) -> Self {
        Self {
            transport,
            repository,
        }
    }

    pub async fn route(&mut self, command: Command) -> Result<RouteOutcome, GraderError> {
        metrics::COMMANDS_PROCESSED_TOTAL
            .with_label_values(&[command.name()])
            .inc();
        match command {
            Command::Directory => self.list_directory().await,
            Command::Ping => {
                self.transport.send(ServerMessage::Pong).await?;
                Ok(RouteOutcome::Pong)
            }
            Command::Assignment(name) => self.run_assignment(&name).await,
        }
    }

    async fn list_directory(&mut self) -> Result<RouteOutcome, GraderError> {
        let names = self.repository.assignment_names().await?;
        let count = names.len();
        for name in names {
            self.transport.feed(ServerMessage::Line(name)).await?;
        }
        self.transport.send(ServerMessage::End).await?;
        debug!("Listed {} assignments", count);
        Ok(RouteOutcome::Listed(count))
    }

    async fn run_assignment(&mut self, name: &str) -> Result<RouteOutcome, GraderError> {
        let Some(assignment) = self.repository.find_assignment(name).await else {
            info!("Unknown assignment {:?}", name);
            self.transport.send(ServerMessage::InvalidAssignment).await?;
            return Ok(RouteOutcome::InvalidAssignment);
        };

        // One listing feeds both the announced count and the runs.
        let test_cases = assignment.test_cases().await?;
        info!(
            "Running assignment '{}' ({} test cases)",
            assignment.name,
            test_cases.len()
        );
        self.transport
            .send(ServerMessage::Count(test_cases.len()))
            .await?;

        let mut verdicts = Vec::with_capacity(test_cases.len());
        let mut runner = TestCaseRunner::new(&mut *self.transport);
        for test_case in &test_cases {
            verdicts.push(runner.run(test_case).await?);
        }
        Ok(RouteOutcome::Graded(verdicts))
    }
}
