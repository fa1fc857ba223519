// tests/integration/server_test.rs

//! End-to-end tests over real loopback TCP, including concurrent sessions.

use super::fixtures::{self, ADDER, DOUBLER};
use super::test_helpers::TestRepository;
use raptor_server::config::Config;
use raptor_server::core::metrics;
use raptor_server::server;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct RunningServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl RunningServer {
    async fn start(repo: &TestRepository) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = Config {
            assignments_path: Some(repo.path().to_string_lossy().into_owned()),
            ..Config::default()
        };
        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server::run_with_listener(config, listener, async move {
            let _ = rx.await;
        }));
        Self {
            addr,
            shutdown: Some(tx),
            task,
        }
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await.unwrap().unwrap();
    }
}

struct TcpClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TcpClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    async fn send(&mut self, text: &str) {
        self.writer.write_all(text.as_bytes()).await.unwrap();
    }

    async fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await.unwrap() == 0 {
            return None;
        }
        Some(line.trim_end_matches("\r\n").to_string())
    }

    async fn read_block(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line().await {
            if line == "EOF" {
                break;
            }
            lines.push(line);
        }
        lines
    }
}

#[tokio::test]
async fn test_server_answers_ping_over_tcp() {
    let repo = TestRepository::new();
    let server = RunningServer::start(&repo).await;

    let mut client = TcpClient::connect(server.addr).await;
    client.send("ping\r\n").await;
    assert_eq!(client.read_line().await.as_deref(), Some("PONG!"));
    assert_eq!(client.read_line().await, None);

    assert!(metrics::gather_metrics().contains("raptor_connections_received_total"));
    server.stop().await;
}

#[tokio::test]
async fn test_server_lists_and_grades_over_tcp() {
    let repo = TestRepository::new();
    fixtures::adder(&repo);
    let server = RunningServer::start(&repo).await;

    let mut client = TcpClient::connect(server.addr).await;
    client.send("directory\r\n").await;
    assert_eq!(client.read_block().await, vec![ADDER]);
    assert_eq!(client.read_line().await, None);

    let mut client = TcpClient::connect(server.addr).await;
    client.send("adder\r\n").await;
    assert_eq!(client.read_line().await.as_deref(), Some("1"));
    assert_eq!(client.read_block().await, vec!["2", "3"]);
    client.send("5\r\ndone\r\neof\r\n").await;
    assert_eq!(client.read_line().await.as_deref(), Some("CORRECT"));
    assert_eq!(client.read_line().await, None);

    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_sessions_get_independent_verdicts() {
    let repo = TestRepository::new();
    fixtures::doubler(&repo, 3);
    fixtures::adder(&repo);
    let server = RunningServer::start(&repo).await;
    let addr = server.addr;

    let mut clients = Vec::new();
    for i in 0..12 {
        let answer_correctly = i % 2 == 0;
        clients.push(tokio::spawn(async move {
            let mut client = TcpClient::connect(addr).await;
            let mut verdicts = Vec::new();
            if i % 3 == 0 {
                client.send("adder\r\n").await;
                assert_eq!(client.read_line().await.as_deref(), Some("1"));
                client.read_block().await;
                let sum = if answer_correctly { "5" } else { "6" };
                client.send(&format!("{sum}\r\ndone\r\nEOF\r\n")).await;
                verdicts.push(client.read_line().await.unwrap());
            } else {
                client.send(&format!("{DOUBLER}\r\n")).await;
                assert_eq!(client.read_line().await.as_deref(), Some("3"));
                for _ in 0..3 {
                    let input = client.read_block().await;
                    let answer = if answer_correctly {
                        fixtures::doubled(&input)
                    } else {
                        "wrong".to_string()
                    };
                    client.send(&format!("{answer}\r\neof\r\n")).await;
                    verdicts.push(client.read_line().await.unwrap());
                }
            }
            assert_eq!(client.read_line().await, None);
            (answer_correctly, verdicts)
        }));
    }

    for handle in clients {
        let (answer_correctly, verdicts) = handle.await.unwrap();
        let expected = if answer_correctly { "CORRECT" } else { "INCORRECT" };
        assert!(!verdicts.is_empty());
        assert!(verdicts.iter().all(|v| v == expected), "{verdicts:?}");
    }

    server.stop().await;
}

#[tokio::test]
async fn test_server_refuses_missing_repository() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = Config {
        assignments_path: Some("/definitely/not/here".to_string()),
        ..Config::default()
    };
    let result = server::run_with_listener(config, listener, async {}).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_server_refuses_unset_repository() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let result = server::run_with_listener(Config::default(), listener, async {}).await;
    assert!(result.is_err());
}
