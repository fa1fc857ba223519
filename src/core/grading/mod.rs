// src/core/grading/mod.rs

//! Running test cases against a client and judging its answers.

mod runner;
mod verdict;

pub use runner::{TestCaseRunner, is_end_marker};
pub use verdict::{Verdict, grade};
