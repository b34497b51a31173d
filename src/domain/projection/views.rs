use serde::Serialize;

use crate::domain::foundation::{GroupId, RideId, Timestamp, UserId, Version, Versioned};
use crate::domain::group::{Group, GroupState};
use crate::domain::lifecycle::{GroupStatus, PaymentState, RequestState, RideStatus, SeatStanding};
use crate::domain::ride::{PaymentQrCode, Ride, RiderSeat};

/// Row in a group listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: GroupId,
    pub creator_id: UserId,
    pub capacity: u32,
    pub member_count: usize,
    /// Seats still free for joiners
    pub open_seats: u32,
    pub status: GroupStatus,
    pub ride_id: Option<RideId>,
    pub created_at: Timestamp,
}

impl From<&Group> for GroupSummary {
    fn from(group: &Group) -> Self {
        let member_count = group.member_count();
        Self {
            id: *group.id(),
            creator_id: group.creator_id().clone(),
            capacity: group.capacity(),
            member_count,
            open_seats: group.capacity().saturating_sub(member_count as u32),
            status: group.status(),
            ride_id: group.ride_id(),
            created_at: *group.created_at(),
        }
    }
}

/// Full group detail for a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub id: GroupId,
    pub creator_id: UserId,
    pub capacity: u32,
    pub members: Vec<UserId>,
    pub status: GroupStatus,
    pub locked_by: Option<UserId>,
    pub ride_id: Option<RideId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub version: Version,
}

impl From<&Versioned<Group>> for GroupView {
    fn from(snapshot: &Versioned<Group>) -> Self {
        let group = &snapshot.value;
        let locked_by = match group.state() {
            GroupState::Locked { locked_by, .. } => Some(locked_by.clone()),
            _ => None,
        };
        Self {
            id: *group.id(),
            creator_id: group.creator_id().clone(),
            capacity: group.capacity(),
            members: group.members().to_vec(),
            status: group.status(),
            locked_by,
            ride_id: group.ride_id(),
            created_at: *group.created_at(),
            updated_at: *group.updated_at(),
            version: snapshot.version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub rider_id: UserId,
    pub request_state: RequestState,
    pub payment_state: PaymentState,
    /// True once the seat no longer blocks closing
    pub resolved: bool,
    pub updated_at: Timestamp,
}

impl From<&RiderSeat> for SeatView {
    fn from(seat: &RiderSeat) -> Self {
        Self {
            rider_id: seat.rider_id().clone(),
            request_state: seat.request_state(),
            payment_state: seat.payment_state(),
            resolved: seat.standing() != SeatStanding::Outstanding,
            updated_at: *seat.updated_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeView {
    pub reference: String,
    pub content_type: String,
    pub attached_at: Timestamp,
}

impl From<&PaymentQrCode> for QrCodeView {
    fn from(qr: &PaymentQrCode) -> Self {
        Self {
            reference: qr.reference().to_string(),
            content_type: qr.content_type().to_string(),
            attached_at: *qr.attached_at(),
        }
    }
}

/// Ride detail for its driver and seat holders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideView {
    pub id: RideId,
    pub group_id: GroupId,
    pub driver_id: UserId,
    pub status: RideStatus,
    pub seat_capacity: u32,
    pub seats: Vec<SeatView>,
    pub has_qr_code: bool,
    pub created_at: Timestamp,
    pub closed_at: Option<Timestamp>,
    pub version: Version,
}

impl From<&Versioned<Ride>> for RideView {
    fn from(snapshot: &Versioned<Ride>) -> Self {
        let ride = &snapshot.value;
        Self {
            id: *ride.id(),
            group_id: *ride.group_id(),
            driver_id: ride.driver_id().clone(),
            status: ride.status(),
            seat_capacity: ride.seat_capacity(),
            seats: ride.seats().map(SeatView::from).collect(),
            has_qr_code: ride.qr_code().is_some(),
            created_at: *ride.created_at(),
            closed_at: ride.closed_at().copied(),
            version: snapshot.version,
        }
    }
}

/// Payment status of every seat plus what still blocks closing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsView {
    pub ride_id: RideId,
    pub driver_id: UserId,
    pub status: RideStatus,
    pub qr_code: Option<QrCodeView>,
    pub seats: Vec<SeatView>,
    pub unsettled_riders: Vec<UserId>,
    pub settleable: bool,
}
