//! Pure read functions over committed group and ride snapshots.

use super::views::{GroupSummary, GroupView, PaymentDetailsView, QrCodeView, RideView, SeatView};
use crate::domain::foundation::{RideError, UserId, Versioned};
use crate::domain::group::Group;
use crate::domain::lifecycle::{guard, ride_rules, GroupStatus, Operation};
use crate::domain::ride::Ride;

/// Groups still accepting members, oldest first.
pub fn open_groups<'a>(groups: impl IntoIterator<Item = &'a Group>) -> Vec<GroupSummary> {
    summarize(groups.into_iter().filter(|g| g.status() == GroupStatus::Open))
}

/// Every group `user` belongs to, whatever its status, oldest first.
pub fn groups_of<'a>(
    user: &UserId,
    groups: impl IntoIterator<Item = &'a Group>,
) -> Vec<GroupSummary> {
    summarize(groups.into_iter().filter(|g| g.is_member(user)))
}

fn summarize<'a>(groups: impl Iterator<Item = &'a Group>) -> Vec<GroupSummary> {
    let mut rows: Vec<GroupSummary> = groups.map(GroupSummary::from).collect();
    rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    rows
}

/// # Errors
///
/// - `Unauthorized` unless `actor` is a member
pub fn group_view(actor: &UserId, group: &Versioned<Group>) -> Result<GroupView, RideError> {
    guard(Operation::ViewGroup, actor, &group.value)?;
    Ok(GroupView::from(group))
}

/// # Errors
///
/// - `Unauthorized` unless `actor` drives or holds a seat
pub fn ride_view(actor: &UserId, ride: &Versioned<Ride>) -> Result<RideView, RideError> {
    guard(Operation::ViewRide, actor, &ride.value)?;
    Ok(RideView::from(ride))
}

/// # Errors
///
/// - `Unauthorized` unless `actor` drives or holds a seat
pub fn payment_details(actor: &UserId, ride: &Ride) -> Result<PaymentDetailsView, RideError> {
    guard(Operation::ViewRide, actor, ride)?;

    let unsettled_riders = ride_rules::unsettled_riders(ride);
    Ok(PaymentDetailsView {
        ride_id: *ride.id(),
        driver_id: ride.driver_id().clone(),
        status: ride.status(),
        qr_code: ride.qr_code().map(QrCodeView::from),
        seats: ride.seats().map(SeatView::from).collect(),
        settleable: unsettled_riders.is_empty(),
        unsettled_riders,
    })
}
