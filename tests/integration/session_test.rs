// tests/integration/session_test.rs

//! Session lifecycle: command reading, ping, blank commands and stream release.

use super::test_helpers::{TestRepository, test_addr};
use raptor_server::connection::ConnectionHandler;
use raptor_server::core::GraderError;
use raptor_server::core::handler::RouteOutcome;
use std::time::Duration;

#[tokio::test]
async fn test_ping_replies_pong_and_closes() {
    let repo = TestRepository::new();
    let (mut client, session) = repo.connect();

    client.send_line("ping").await;
    assert_eq!(client.read_line().await.as_deref(), Some("PONG!"));
    client.expect_closed().await;

    assert_eq!(session.await.unwrap(), Ok(Some(RouteOutcome::Pong)));
}

#[tokio::test]
async fn test_ping_is_case_insensitive_and_trimmed() {
    let repo = TestRepository::new();
    let (mut client, session) = repo.connect();

    client.send_line("  PiNG \t").await;
    assert_eq!(client.read_line().await.as_deref(), Some("PONG!"));
    client.expect_closed().await;
    assert_eq!(session.await.unwrap(), Ok(Some(RouteOutcome::Pong)));
}

#[tokio::test]
async fn test_ping_over_mock_stream_writes_exact_bytes() {
    let repo = TestRepository::new();
    let stream = tokio_test::io::Builder::new()
        .read(b"ping\r\n")
        .write(b"PONG!\r\n")
        .build();
    let handler = ConnectionHandler::new(stream, test_addr(), repo.repository(), 7, None);
    assert_eq!(handler.run().await, Ok(Some(RouteOutcome::Pong)));
}

#[tokio::test]
async fn test_command_without_crlf_is_accepted() {
    let repo = TestRepository::new();
    let (mut client, session) = repo.connect();

    client.send_raw(b"ping").await;
    assert_eq!(client.read_line().await.as_deref(), Some("PONG!"));
    client.expect_closed().await;
    assert!(session.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_bytes_after_first_line_are_ignored() {
    let repo = TestRepository::new();
    let (mut client, session) = repo.connect();

    client.send_raw(b"ping\r\ndirectory\r\n").await;
    assert_eq!(client.read_line().await.as_deref(), Some("PONG!"));
    client.expect_closed().await;
    assert_eq!(session.await.unwrap(), Ok(Some(RouteOutcome::Pong)));
}

#[tokio::test]
async fn test_blank_command_closes_silently() {
    let repo = TestRepository::new();
    let (mut client, session) = repo.connect();

    client.send_line("   ").await;
    client.expect_closed().await;
    assert_eq!(session.await.unwrap(), Ok(None));
}

#[tokio::test]
async fn test_client_closing_before_command_ends_session() {
    let repo = TestRepository::new();
    let (mut client, session) = repo.connect();

    client.shutdown().await;
    client.expect_closed().await;
    assert_eq!(session.await.unwrap(), Ok(None));
}

#[tokio::test]
async fn test_idle_client_times_out_when_configured() {
    let repo = TestRepository::new();
    let (mut client, session) = repo.connect_with_timeout(Some(Duration::from_millis(50)));

    assert_eq!(session.await.unwrap(), Err(GraderError::ReadTimeout));
    client.expect_closed().await;
}

#[tokio::test]
async fn test_many_sessions_are_independent() {
    let repo = TestRepository::new();
    let mut sessions = Vec::new();
    for _ in 0..16 {
        sessions.push(repo.connect());
    }
    for (client, _) in sessions.iter_mut() {
        client.send_line("ping").await;
    }
    for (mut client, session) in sessions {
        assert_eq!(client.read_line().await.as_deref(), Some("PONG!"));
        client.expect_closed().await;
        assert_eq!(session.await.unwrap(), Ok(Some(RouteOutcome::Pong)));
    }
}
