//! Rider seat sub-entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RideError, Timestamp, UserId};
use crate::domain::lifecycle::{
    next_seat_state, standing, PaymentState, RequestState, SeatAction, SeatStanding,
};

/// One rider's request and payment progress within a ride.
///
/// Declined and rejected seats are kept so the history stays auditable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderSeat {
    rider_id: UserId,
    request_state: RequestState,
    payment_state: PaymentState,
    requested_at: Timestamp,
    updated_at: Timestamp,
}

impl RiderSeat {
    /// A fresh seat request awaiting the driver's decision.
    pub fn requested(rider_id: UserId) -> Self {
        let now = Timestamp::now();
        Self {
            rider_id,
            request_state: RequestState::Requested,
            payment_state: PaymentState::NotApplicable,
            requested_at: now,
            updated_at: now,
        }
    }

    pub fn rider_id(&self) -> &UserId {
        &self.rider_id
    }

    pub fn request_state(&self) -> RequestState {
        self.request_state
    }

    pub fn payment_state(&self) -> PaymentState {
        self.payment_state
    }

    pub fn requested_at(&self) -> &Timestamp {
        &self.requested_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn standing(&self) -> SeatStanding {
        standing(self.request_state, self.payment_state)
    }

    /// Checks `action` against the seat graph without changing the seat.
    pub(crate) fn preview(&self, action: SeatAction) -> Result<(RequestState, PaymentState), RideError> {
        next_seat_state(self.request_state, self.payment_state, action)
    }

    /// Applies `action`. On failure the seat is unchanged.
    pub(crate) fn apply(&mut self, action: SeatAction) -> Result<(), RideError> {
        let (request_state, payment_state) = self.preview(action)?;
        self.request_state = request_state;
        self.payment_state = payment_state;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
