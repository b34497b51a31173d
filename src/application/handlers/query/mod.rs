//! Query handlers.
//!
//! Read committed snapshots through `GroupReader` and shape them with the
//! projection functions. They never take the write path.

mod get_group;
mod get_ride;
mod list_groups;

pub use get_group::{GetGroupHandler, GetGroupQuery};
pub use get_ride::{GetPaymentDetailsHandler, GetRideHandler, GetRideQuery};
pub use list_groups::{
    ListOpenGroupsHandler, ListOpenGroupsQuery, ListUserGroupsHandler, ListUserGroupsQuery,
};
