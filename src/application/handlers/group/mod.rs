//! Group command handlers.

mod create_group;
mod disband_group;
mod join_group;
mod leave_group;
mod lock_group;

pub use create_group::{CreateGroupCommand, CreateGroupHandler, CreateGroupResult};
pub use disband_group::{DisbandGroupCommand, DisbandGroupHandler, DisbandGroupResult};
pub use join_group::{JoinGroupCommand, JoinGroupHandler, JoinGroupResult};
pub use leave_group::{LeaveGroupCommand, LeaveGroupHandler, LeaveGroupResult};
pub use lock_group::{LockGroupCommand, LockGroupHandler, LockGroupResult};
