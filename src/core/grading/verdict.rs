// src/core/grading/verdict.rs

use std::fmt;

/// The result of one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Correct => "CORRECT",
            Verdict::Incorrect => "INCORRECT",
        }
    }

    /// Lower-case label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Correct => "correct",
            Verdict::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for Verdict {
    fn from(correct: bool) -> Self {
        if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

/// Compares the expected lines position by position with the client's
/// responses.
///
/// Every expected line must be matched exactly by the response at the same
/// index. A response that runs out early is `Incorrect`; responses past the
/// end of `expected` are ignored.
pub fn grade<E, R>(expected: &[E], responses: &[R]) -> Verdict
where
    E: AsRef<str>,
    R: AsRef<str>,
{
    let correct = expected.iter().enumerate().all(|(i, want)| {
        responses
            .get(i)
            .is_some_and(|got| got.as_ref() == want.as_ref())
    });
    Verdict::from(correct)
}
