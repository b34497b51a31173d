//! Ride aggregate entity.
//!
//! A ride is the concrete trip created from a locked group. It owns one
//! [`RiderSeat`] per rider and is closed by its driver once every seat is
//! settled or excluded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{PaymentQrCode, RiderSeat};
use crate::domain::foundation::{GroupId, RideError, RideId, Timestamp, UserId};
use crate::domain::group::Group;
use crate::domain::lifecycle::{
    guard, ride_rules, Guarded, Operation, RiderDecision, RideStatus, Role, SeatAction,
    StateMachine,
};

/// Ride aggregate.
///
/// # Invariants
///
/// - at most one seat per rider, never one for the driver
/// - seats occupying capacity never exceed `seat_capacity`
/// - a closed ride has no outstanding seats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ride {
    id: RideId,
    group_id: GroupId,
    driver_id: UserId,
    status: RideStatus,
    seat_capacity: u32,
    seats: BTreeMap<UserId, RiderSeat>,
    qr_code: Option<PaymentQrCode>,
    created_at: Timestamp,
    closed_at: Option<Timestamp>,
}

impl Ride {
    /// Build the ride for a locked group, seeding a requested seat for every
    /// member except the driver.
    ///
    /// The group must already have accepted the ride via
    /// [`Group::attach_ride`], which enforces the creation preconditions.
    pub fn for_group(id: RideId, group: &Group, driver_id: UserId) -> Self {
        let seats = group
            .members()
            .iter()
            .filter(|member| **member != driver_id)
            .map(|member| (member.clone(), RiderSeat::requested(member.clone())))
            .collect();

        Self {
            id,
            group_id: *group.id(),
            driver_id,
            status: RideStatus::Active,
            seat_capacity: group.capacity().saturating_sub(1),
            seats,
            qr_code: None,
            created_at: Timestamp::now(),
            closed_at: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &RideId {
        &self.id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn driver_id(&self) -> &UserId {
        &self.driver_id
    }

    pub fn status(&self) -> RideStatus {
        self.status
    }

    pub fn seat_capacity(&self) -> u32 {
        self.seat_capacity
    }

    pub fn seat(&self, rider_id: &UserId) -> Option<&RiderSeat> {
        self.seats.get(rider_id)
    }

    /// Seats in rider id order.
    pub fn seats(&self) -> impl Iterator<Item = &RiderSeat> {
        self.seats.values()
    }

    pub fn qr_code(&self) -> Option<&PaymentQrCode> {
        self.qr_code.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn closed_at(&self) -> Option<&Timestamp> {
        self.closed_at.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// - `RideClosed`, `Unauthorized` (driver), `DuplicateRequest`
    pub fn request_seat(&mut self, rider_id: UserId) -> Result<(), RideError> {
        ride_rules::check_request_seat(self, &rider_id)?;

        self.seats
            .insert(rider_id.clone(), RiderSeat::requested(rider_id));
        Ok(())
    }

    /// Driver accepts or declines a requested seat.
    ///
    /// # Errors
    ///
    /// - `RideClosed`, `Unauthorized`, `SeatNotFound`
    /// - `InvalidTransition` unless the seat is requested
    /// - `RideFull` when accepting with no seat left
    pub fn decide_rider(
        &mut self,
        driver: &UserId,
        rider_id: &UserId,
        decision: RiderDecision,
    ) -> Result<(), RideError> {
        let action = decision.action();
        let seat = ride_rules::check_seat_operation(self, Operation::DecideRider, driver, rider_id)?;
        seat.preview(action)?;
        if decision == RiderDecision::Accept {
            ride_rules::check_seat_available(self)?;
        }
        self.seat_mut(rider_id)?.apply(action)
    }

    /// Rider reports having paid.
    ///
    /// # Errors
    ///
    /// - `RideClosed`, `Unauthorized` (not the seat's rider), `SeatNotFound`
    /// - `InvalidTransition` unless payment is pending
    pub fn mark_paid(&mut self, actor: &UserId, rider_id: &UserId) -> Result<(), RideError> {
        self.apply_seat_action(Operation::MarkPaid, actor, rider_id, SeatAction::MarkPaid)
    }

    /// # Errors
    ///
    /// - `RideClosed`, `Unauthorized`, `SeatNotFound`
    /// - `InvalidTransition` unless payment is marked paid
    pub fn verify_payment(&mut self, driver: &UserId, rider_id: &UserId) -> Result<(), RideError> {
        self.apply_seat_action(
            Operation::ReviewPayment,
            driver,
            rider_id,
            SeatAction::VerifyPayment,
        )
    }

    /// # Errors
    ///
    /// - `RideClosed`, `Unauthorized`, `SeatNotFound`
    /// - `InvalidTransition` unless payment is marked paid
    pub fn reject_payment(&mut self, driver: &UserId, rider_id: &UserId) -> Result<(), RideError> {
        self.apply_seat_action(
            Operation::ReviewPayment,
            driver,
            rider_id,
            SeatAction::RejectPayment,
        )
    }

    /// Close a settled ride.
    ///
    /// # Errors
    ///
    /// - `RideClosed`, `Unauthorized`
    /// - `RideNotSettleable` listing riders still outstanding
    pub fn close(&mut self, driver: &UserId) -> Result<(), RideError> {
        ride_rules::check_close(self, driver)?;

        self.status = self.status.transition_to(RideStatus::Closed)?;
        self.closed_at = Some(Timestamp::now());
        Ok(())
    }

    /// Attach payment instructions, replacing any previous QR code.
    ///
    /// # Errors
    ///
    /// - `RideClosed`, `Unauthorized`
    pub fn attach_qr_code(&mut self, driver: &UserId, qr_code: PaymentQrCode) -> Result<(), RideError> {
        ride_rules::ensure_active(self)?;
        guard(Operation::AttachQrCode, driver, &*self)?;

        self.qr_code = Some(qr_code);
        Ok(())
    }

    fn apply_seat_action(
        &mut self,
        operation: Operation,
        actor: &UserId,
        rider_id: &UserId,
        action: SeatAction,
    ) -> Result<(), RideError> {
        ride_rules::check_seat_operation(self, operation, actor, rider_id)?;
        self.seat_mut(rider_id)?.apply(action)
    }

    fn seat_mut(&mut self, rider_id: &UserId) -> Result<&mut RiderSeat, RideError> {
        let ride_id = self.id;
        self.seats
            .get_mut(rider_id)
            .ok_or_else(|| RideError::SeatNotFound {
                ride_id,
                rider_id: rider_id.clone(),
            })
    }
}

impl Guarded for Ride {
    fn holds_role(&self, user: &UserId, role: Role) -> bool {
        match role {
            Role::Driver => &self.driver_id == user,
            Role::SeatHolder => self.seats.contains_key(user),
            Role::Participant => &self.driver_id == user || self.seats.contains_key(user),
            Role::NonDriver => &self.driver_id != user,
            Role::Creator | Role::Member => false,
        }
    }
}
