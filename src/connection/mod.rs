// src/connection/mod.rs

//! Manages the lifecycle of a single client connection: reading its one
//! command, routing it, and releasing the stream afterwards.

mod guard;
mod handler;

pub use guard::ConnectionGuard;
pub use handler::ConnectionHandler;
