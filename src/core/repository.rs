// src/core/repository.rs

//! Read-only queries against the assignment repository on disk.
//!
//! The repository root holds one directory per assignment, and every
//! assignment holds one directory per test case. Hidden entries (names
//! starting with `.`) and plain files are never exposed at either level.

use crate::core::GraderError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Input lines sent to the client.
pub const INPUT_FILE: &str = "in.txt";
/// Lines the client is expected to answer with.
pub const EXPECTED_FILE: &str = "out.txt";

/// Lists the names of the visible subdirectories of `path`, in the order the
/// filesystem returns them.
///
/// Symlinks are followed, so a link to a directory counts as a directory.
/// Counting and running test cases both go through this function, which
/// keeps the announced count and the executed runs in step.
pub async fn list_subdirectories(path: &Path) -> Result<Vec<String>, GraderError> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        match tokio::fs::metadata(entry.path()).await {
            Ok(meta) if meta.is_dir() => names.push(name),
            Ok(_) => {}
            Err(e) => debug!("Skipping unreadable entry {}: {}", entry.path().display(), e),
        }
    }
    Ok(names)
}

/// Returns true if `name` may be resolved as a directory directly below the
/// repository root.
pub fn is_valid_assignment_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains('/')
        && !name.contains('\0')
}

/// The on-disk collection of assignments served to clients.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    root: PathBuf,
}

impl AssignmentRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all assignments, in listing order.
    pub async fn assignment_names(&self) -> Result<Vec<String>, GraderError> {
        list_subdirectories(&self.root).await
    }

    /// Resolves `name` to an assignment. Returns `None` for names that are not
    /// a visible directory directly under the root.
    pub async fn find_assignment(&self, name: &str) -> Option<Assignment> {
        if !is_valid_assignment_name(name) {
            debug!("Rejected assignment name {:?}", name);
            return None;
        }
        let path = self.root.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Some(Assignment {
                name: name.to_string(),
                path,
            }),
            _ => None,
        }
    }
}

/// A directory of test cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub path: PathBuf,
}

impl Assignment {
    /// All test cases of this assignment, in listing order.
    pub async fn test_cases(&self) -> Result<Vec<TestCase>, GraderError> {
        let names = list_subdirectories(&self.path).await?;
        Ok(names
            .into_iter()
            .map(|name| TestCase {
                path: self.path.join(&name),
                name,
            })
            .collect())
    }
}

/// A directory with an `in.txt` and an `out.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub path: PathBuf,
}

impl TestCase {
    pub fn input_path(&self) -> PathBuf {
        self.path.join(INPUT_FILE)
    }

    pub fn expected_path(&self) -> PathBuf {
        self.path.join(EXPECTED_FILE)
    }

    /// Every line of `in.txt`, trimmed. Blank lines are kept.
    pub async fn input_lines(&self) -> Result<Vec<String>, GraderError> {
        let text = read_test_file(self.input_path()).await?;
        Ok(text_lines(&text)
            .into_iter()
            .map(|l| l.trim().to_string())
            .collect())
    }

    /// The non-blank lines of `out.txt`, trimmed.
    pub async fn expected_lines(&self) -> Result<Vec<String>, GraderError> {
        let text = read_test_file(self.expected_path()).await?;
        Ok(text_lines(&text)
            .into_iter()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Splits text on `\r\n`, `\n` or a lone `\r`. A final terminator does not
/// start an extra empty line.
fn text_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(i) => {
                lines.push(&rest[..i]);
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

async fn read_test_file(path: PathBuf) -> Result<String, GraderError> {
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => Err(GraderError::missing_test_file(path, e)),
    }
}
