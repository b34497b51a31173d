//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers share one optimistic write path; query handlers only
//! read.

pub mod handlers;
mod write_path;

pub use handlers::*;
pub use write_path::{Committed, Staged, WritePath};
