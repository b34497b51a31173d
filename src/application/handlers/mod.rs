//! Application handlers.
//!
//! Command handlers run domain transitions through the shared
//! [`WritePath`](crate::application::WritePath); query handlers read
//! committed snapshots.

pub mod group;
pub mod query;
pub mod ride;

#[cfg(test)]
pub(crate) mod test_support;

pub use group::{
    CreateGroupCommand, CreateGroupHandler, CreateGroupResult, DisbandGroupCommand,
    DisbandGroupHandler, DisbandGroupResult, JoinGroupCommand, JoinGroupHandler, JoinGroupResult,
    LeaveGroupCommand, LeaveGroupHandler, LeaveGroupResult, LockGroupCommand, LockGroupHandler,
    LockGroupResult,
};
pub use query::{
    GetGroupHandler, GetGroupQuery, GetPaymentDetailsHandler, GetRideHandler, GetRideQuery,
    ListOpenGroupsHandler, ListOpenGroupsQuery, ListUserGroupsHandler, ListUserGroupsQuery,
};
pub use ride::{
    CloseRideCommand, CloseRideHandler, CloseRideResult, CreateRideCommand, CreateRideHandler,
    CreateRideResult, MarkPaidCommand, MarkPaidHandler, MarkPaidResult, PaymentReview,
    RequestSeatCommand, RequestSeatHandler, RequestSeatResult, ReviewPaymentCommand,
    ReviewPaymentHandler, ReviewPaymentResult, UpdateRiderStatusCommand,
    UpdateRiderStatusHandler, UpdateRiderStatusResult, UploadQrCodeCommand, UploadQrCodeHandler,
    UploadQrCodeResult,
};
