//! Query/projection layer.
//!
//! Read-only views derived from committed snapshots. Nothing here mutates
//! or touches the write path; authorization goes through the same guard as
//! commands.

mod queries;
mod views;

pub use queries::{group_view, groups_of, open_groups, payment_details, ride_view};
pub use views::{
    GroupSummary, GroupView, PaymentDetailsView, QrCodeView, RideView, SeatView,
};
