//! Rider seat transition graph.
//!
//! ```text
//! Requested -accept-> Accepted/Pending -mark_paid-> MarkedPaid -verify-> Verified
//! Requested -decline-> Declined
//! MarkedPaid -reject_payment-> Rejected
//! ```
//!
//! A seat's state is the pair (request, payment). Every action moves the pair
//! along exactly one edge of the graph above or fails with `InvalidTransition`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{PaymentState, RequestState, StateMachine};
use crate::domain::foundation::RideError;

/// An action applied to a rider seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatAction {
    Accept,
    Decline,
    MarkPaid,
    VerifyPayment,
    RejectPayment,
}

impl fmt::Display for SeatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeatAction::Accept => "accept",
            SeatAction::Decline => "decline",
            SeatAction::MarkPaid => "mark_paid",
            SeatAction::VerifyPayment => "verify_payment",
            SeatAction::RejectPayment => "reject_payment",
        };
        write!(f, "{}", s)
    }
}

/// Driver decision on a pending seat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiderDecision {
    Accept,
    Reject,
}

impl RiderDecision {
    /// The seat action this decision applies.
    pub fn action(&self) -> SeatAction {
        match self {
            RiderDecision::Accept => SeatAction::Accept,
            RiderDecision::Reject => SeatAction::Decline,
        }
    }
}

/// Where a seat stands with respect to closing its ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatStanding {
    /// Still needs a driver decision or payment verification.
    Outstanding,
    /// Payment verified.
    Settled,
    /// Declined or payment rejected; ignored for capacity and closing.
    Excluded,
}

/// Computes the next (request, payment) pair for `action`.
///
/// # Errors
///
/// - `InvalidTransition` if the action is not an edge out of the current pair
pub fn next_seat_state(
    request: RequestState,
    payment: PaymentState,
    action: SeatAction,
) -> Result<(RequestState, PaymentState), RideError> {
    let rejected = || RideError::InvalidTransition {
        entity: "seat",
        from: format!("{:?}/{:?}", request, payment),
        to: action.to_string(),
    };

    match action {
        SeatAction::Accept => {
            let request = request.transition_to(RequestState::Accepted).map_err(|_| rejected())?;
            let payment = payment.transition_to(PaymentState::Pending).map_err(|_| rejected())?;
            Ok((request, payment))
        }
        SeatAction::Decline => {
            let request = request.transition_to(RequestState::Declined).map_err(|_| rejected())?;
            Ok((request, payment))
        }
        SeatAction::MarkPaid | SeatAction::VerifyPayment | SeatAction::RejectPayment => {
            if request != RequestState::Accepted {
                return Err(rejected());
            }
            let target = match action {
                SeatAction::MarkPaid => PaymentState::MarkedPaid,
                SeatAction::VerifyPayment => PaymentState::Verified,
                _ => PaymentState::Rejected,
            };
            let payment = payment.transition_to(target).map_err(|_| rejected())?;
            Ok((request, payment))
        }
    }
}

/// Classifies a seat for capacity and settlement checks.
pub fn standing(request: RequestState, payment: PaymentState) -> SeatStanding {
    match (request, payment) {
        (RequestState::Declined, _) | (_, PaymentState::Rejected) => SeatStanding::Excluded,
        (_, PaymentState::Verified) => SeatStanding::Settled,
        _ => SeatStanding::Outstanding,
    }
}

/// Returns true if the seat counts against the ride's seat capacity.
pub fn occupies_seat(request: RequestState, payment: PaymentState) -> bool {
    request == RequestState::Accepted && standing(request, payment) != SeatStanding::Excluded
}
