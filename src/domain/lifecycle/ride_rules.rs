//! Preconditions for ride and seat transitions, including settlement.

use super::{guard, occupies_seat, standing, Operation, RideStatus, SeatStanding};
use crate::domain::foundation::{RideError, UserId};
use crate::domain::ride::{Ride, RiderSeat};

/// # Errors
///
/// - `RideClosed` if the ride no longer accepts changes
pub fn ensure_active(ride: &Ride) -> Result<(), RideError> {
    if ride.status() == RideStatus::Closed {
        return Err(RideError::RideClosed(*ride.id()));
    }
    Ok(())
}

/// # Errors
///
/// - `RideClosed` if the ride is closed
/// - `Unauthorized` if the rider is the driver
/// - `DuplicateRequest` if the rider already holds a seat entry
pub fn check_request_seat(ride: &Ride, rider: &UserId) -> Result<(), RideError> {
    ensure_active(ride)?;
    guard(Operation::RequestSeat, rider, ride)?;
    if ride.seat(rider).is_some() {
        return Err(RideError::DuplicateRequest {
            ride_id: *ride.id(),
            rider_id: rider.clone(),
        });
    }
    Ok(())
}

/// Resolves the seat a driver or rider operation targets.
///
/// # Errors
///
/// - `RideClosed` if the ride is closed
/// - `Unauthorized` if the actor lacks the role for `operation`
/// - `SeatNotFound` if the rider has no seat
pub fn check_seat_operation<'a>(
    ride: &'a Ride,
    operation: Operation,
    actor: &UserId,
    rider: &UserId,
) -> Result<&'a RiderSeat, RideError> {
    ensure_active(ride)?;
    guard(operation, actor, ride)?;
    if operation == Operation::MarkPaid && actor != rider {
        return Err(RideError::unauthorized(actor, operation.as_str()));
    }
    ride.seat(rider).ok_or_else(|| RideError::SeatNotFound {
        ride_id: *ride.id(),
        rider_id: rider.clone(),
    })
}

/// # Errors
///
/// - `RideFull` if accepting one more rider would exceed seat capacity
pub fn check_seat_available(ride: &Ride) -> Result<(), RideError> {
    let occupied = ride
        .seats()
        .filter(|seat| occupies_seat(seat.request_state(), seat.payment_state()))
        .count();
    if occupied >= ride.seat_capacity() as usize {
        return Err(RideError::RideFull {
            ride_id: *ride.id(),
            seat_capacity: ride.seat_capacity(),
        });
    }
    Ok(())
}

/// Riders whose seats still block closing, in rider id order.
pub fn unsettled_riders(ride: &Ride) -> Vec<UserId> {
    ride.seats()
        .filter(|seat| {
            standing(seat.request_state(), seat.payment_state()) == SeatStanding::Outstanding
        })
        .map(|seat| seat.rider_id().clone())
        .collect()
}

/// # Errors
///
/// - `RideClosed` if the ride is already closed
/// - `Unauthorized` if the actor is not the driver
/// - `RideNotSettleable` listing every rider that is neither verified nor excluded
pub fn check_close(ride: &Ride, actor: &UserId) -> Result<(), RideError> {
    ensure_active(ride)?;
    guard(Operation::CloseRide, actor, ride)?;
    let unsettled = unsettled_riders(ride);
    if !unsettled.is_empty() {
        return Err(RideError::RideNotSettleable {
            ride_id: *ride.id(),
            unsettled,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{GroupId, RideId};
    use crate::domain::group::Group;
    use crate::domain::lifecycle::{GroupStatus, RiderDecision};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    /// Locked group of `members` with the first member driving.
    fn ride_for(capacity: u32, members: &[&str]) -> Ride {
        let mut group = Group::create(GroupId::new(), user(members[0]), capacity).unwrap();
        for member in &members[1..] {
            group.join(user(member)).unwrap();
        }
        if group.status() != GroupStatus::Locked {
            group.lock(&user(members[0])).unwrap();
        }
        let ride_id = RideId::new();
        group.attach_ride(ride_id, &user(members[0])).unwrap();
        Ride::for_group(ride_id, &group, user(members[0]))
    }

    #[test]
    fn closed_ride_rejects_seat_requests() {
        let mut ride = ride_for(2, &["drv", "ana"]);
        ride.decide_rider(&user("drv"), &user("ana"), RiderDecision::Reject)
            .unwrap();
        ride.close(&user("drv")).unwrap();
        assert_eq!(
            check_request_seat(&ride, &user("new")),
            Err(RideError::RideClosed(*ride.id()))
        );
    }

    #[test]
    fn seeded_member_cannot_request_again() {
        let ride = ride_for(3, &["drv", "ana"]);
        assert!(matches!(
            check_request_seat(&ride, &user("ana")),
            Err(RideError::DuplicateRequest { .. })
        ));
    }

    #[test]
    fn mark_paid_must_come_from_the_rider() {
        let ride = ride_for(3, &["drv", "ana", "ben"]);
        assert!(matches!(
            check_seat_operation(&ride, Operation::MarkPaid, &user("ben"), &user("ana")),
            Err(RideError::Unauthorized { .. })
        ));
        assert!(
            check_seat_operation(&ride, Operation::MarkPaid, &user("ana"), &user("ana")).is_ok()
        );
    }

    #[test]
    fn unsettled_includes_requested_and_unverified_seats() {
        let mut ride = ride_for(4, &["drv", "ana", "ben", "cy"]);
        let drv = user("drv");
        ride.decide_rider(&drv, &user("ana"), RiderDecision::Accept).unwrap();
        ride.mark_paid(&user("ana"), &user("ana")).unwrap();
        ride.verify_payment(&drv, &user("ana")).unwrap();
        ride.decide_rider(&drv, &user("ben"), RiderDecision::Reject).unwrap();

        assert_eq!(unsettled_riders(&ride), vec![user("cy")]);
    }

    #[test]
    fn seat_capacity_counts_only_occupying_seats() {
        let mut ride = ride_for(2, &["drv", "ana"]);
        let drv = user("drv");
        ride.request_seat(user("zed")).unwrap();
        ride.decide_rider(&drv, &user("ana"), RiderDecision::Accept).unwrap();

        assert!(matches!(
            check_seat_available(&ride),
            Err(RideError::RideFull { seat_capacity: 1, .. })
        ));

        ride.mark_paid(&user("ana"), &user("ana")).unwrap();
        ride.reject_payment(&drv, &user("ana")).unwrap();
        assert!(check_seat_available(&ride).is_ok());
    }
}
