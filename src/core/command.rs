// src/core/command.rs

//! Classifies the single command line a client sends when it connects.

/// What a client asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all assignments. Any command containing `directory` selects this.
    Directory,
    /// Liveness check.
    Ping,
    /// Run the named assignment's test cases.
    Assignment(String),
}

impl Command {
    /// Parses a raw command line. Matching is case-insensitive; the returned
    /// assignment name is the trimmed, lower-cased line.
    ///
    /// Returns `None` for a blank line, which ends the session without a reply.
    pub fn parse(line: &str) -> Option<Command> {
        let normalized = line.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        // Substring, not equality: "list directory please" is a listing request.
        if normalized.contains("directory") {
            Some(Command::Directory)
        } else if normalized == "ping" {
            Some(Command::Ping)
        } else {
            Some(Command::Assignment(normalized))
        }
    }

    /// A short label used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Directory => "directory",
            Command::Ping => "ping",
            Command::Assignment(_) => "assignment",
        }
    }
}
