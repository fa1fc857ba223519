// tests/integration/directory_test.rs

//! Directory listing: visible assignment directories, terminated by `EOF`.

use super::test_helpers::TestRepository;
use raptor_server::core::handler::RouteOutcome;

fn repository_with_noise() -> TestRepository {
    let repo = TestRepository::new();
    repo.add_assignment("lab1");
    repo.add_assignment("lab2");
    repo.add_assignment("Final Project");
    repo.add_assignment(".git");
    repo.add_assignment(".hidden");
    repo.add_file("README.txt", "not an assignment");
    repo.add_file(".DS_Store", "");
    repo
}

async fn list(repo: &TestRepository, command: &str) -> Vec<String> {
    let (mut client, session) = repo.connect();
    client.send_line(command).await;
    let mut names = client.read_block().await;
    client.expect_closed().await;
    assert_eq!(
        session.await.unwrap(),
        Ok(Some(RouteOutcome::Listed(names.len())))
    );
    names.sort();
    names
}

#[tokio::test]
async fn test_directory_lists_only_visible_directories() {
    let repo = repository_with_noise();
    assert_eq!(
        list(&repo, "directory").await,
        vec!["Final Project", "lab1", "lab2"]
    );
}

#[tokio::test]
async fn test_directory_matches_as_substring_in_any_case() {
    let repo = repository_with_noise();
    for command in ["DIRECTORY", "list directory please", "subdirectory", "  Directory  "] {
        assert_eq!(
            list(&repo, command).await,
            vec!["Final Project", "lab1", "lab2"],
            "command {command:?}"
        );
    }
}

#[tokio::test]
async fn test_empty_repository_lists_only_eof() {
    let repo = TestRepository::new();
    assert!(list(&repo, "directory").await.is_empty());
}

#[tokio::test]
async fn test_symlinked_assignment_is_listed() {
    let repo = TestRepository::new();
    let target = repo.add_assignment("real");
    std::os::unix::fs::symlink(&target, repo.path().join("alias")).unwrap();
    assert_eq!(list(&repo, "directory").await, vec!["alias", "real"]);
}
