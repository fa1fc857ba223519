// src/core/grading/runner.rs

//! Drives the exchange for a single test case: send the input, collect the
//! client's answer, compare it with the expected output and send the verdict.

use super::verdict::{Verdict, grade};
use crate::core::GraderError;
use crate::core::metrics;
use crate::core::protocol::{LineTransport, ServerMessage};
use crate::core::repository::TestCase;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{Instrument, debug, info, info_span};

/// Returns true for the line that ends a client's answer (`eof`, any case).
pub fn is_end_marker(line: &str) -> bool {
    line.eq_ignore_ascii_case("eof")
}

/// Runs test cases over one session's transport.
pub struct TestCaseRunner<'a, S> {
    transport: &'a mut LineTransport<S>,
}

impl<'a, S> TestCaseRunner<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(transport: &'a mut LineTransport<S>) -> Self {
        Self { transport }
    }

    /// Executes one test case and returns the verdict that was sent.
    ///
    /// A missing `in.txt` or `out.txt` aborts the run with
    /// `GraderError::MissingTestFile`; no verdict is sent in that case.
    pub async fn run(&mut self, test_case: &TestCase) -> Result<Verdict, GraderError> {
        let span = info_span!("test_case", name = %test_case.name);
        self.run_inner(test_case).instrument(span).await
    }

    async fn run_inner(&mut self, test_case: &TestCase) -> Result<Verdict, GraderError> {
        let input = test_case.input_lines().await?;
        self.send_input(input).await?;

        let responses = self.collect_responses().await?;

        let expected = test_case.expected_lines().await?;
        let verdict = grade(&expected, &responses);
        info!(
            "Verdict {} ({} expected lines, {} response lines)",
            verdict,
            expected.len(),
            responses.len()
        );

        self.transport.send(ServerMessage::Verdict(verdict)).await?;
        metrics::VERDICTS_TOTAL
            .with_label_values(&[verdict.label()])
            .inc();
        Ok(verdict)
    }

    async fn send_input(&mut self, lines: Vec<String>) -> Result<(), GraderError> {
        for line in lines {
            debug!("send: {}", line);
            self.transport.feed(ServerMessage::Line(line)).await?;
        }
        self.transport.send(ServerMessage::End).await
    }

    /// Reads response lines until the end marker. Blank lines are skipped and
    /// every kept line is trimmed.
    async fn collect_responses(&mut self) -> Result<Vec<String>, GraderError> {
        self.transport.set_bare_terminator(true);
        let collected = self.read_until_end_marker().await;
        self.transport.set_bare_terminator(false);
        let responses = collected?;
        // Anything the client sent after its end marker is not part of any answer.
        self.transport.discard_buffered_input();
        Ok(responses)
    }

    async fn read_until_end_marker(&mut self) -> Result<Vec<String>, GraderError> {
        let mut responses = Vec::new();
        loop {
            let Some(line) = self.transport.next_line().await? else {
                return Err(GraderError::ConnectionClosed);
            };
            debug!("recv: {}", line);
            if is_end_marker(&line) {
                break;
            }
            let line = line.trim();
            if !line.is_empty() {
                responses.push(line.to_string());
            }
        }
        Ok(responses)
    }
}
