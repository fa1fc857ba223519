// src/core/mod.rs

//! The central module containing the protocol and grading logic.

pub mod command;
pub mod errors;
pub mod grading;
pub mod handler;
pub mod metrics;
pub mod protocol;
pub mod repository;

pub use command::Command;
pub use errors::GraderError;
pub use grading::Verdict;
pub use repository::AssignmentRepository;
