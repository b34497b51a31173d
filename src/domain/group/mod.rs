//! Group domain module.
//!
//! Handles group membership and the lock/complete lifecycle. A locked group
//! is the only thing a ride can be created from.
//!
//! # Events
//!
//! - `GroupCreated`, `MemberJoined`, `MemberLeft`
//! - `GroupLocked`, `GroupDisbanded`, `GroupCompleted`

mod aggregate;
mod events;

pub use aggregate::{Group, GroupState, JoinOutcome, LeaveOutcome};
pub use events::{
    GroupCompleted, GroupCreated, GroupDisbanded, GroupLocked, MemberJoined, MemberLeft,
};
