//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors, events, versions)
//! - `lifecycle` - Status machines, authorization guard, and transition rules
//! - `group` - Group aggregate and membership lifecycle
//! - `ride` - Ride aggregate, rider seats, and payment tracking
//! - `projection` - Read-only views over committed state

pub mod foundation;
pub mod group;
pub mod lifecycle;
pub mod projection;
pub mod ride;
