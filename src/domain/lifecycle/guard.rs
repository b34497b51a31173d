//! Centralized authorization guard.
//!
//! Every operation declares the role it requires; entities report which
//! roles a user holds. `guard` is the single check used by all mutations
//! and queries so the rules cannot drift apart per handler.

use std::fmt;

use crate::domain::foundation::{RideError, UserId};

/// Role a user must hold on an entity to perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Creator of the group.
    Creator,
    /// Any current member of the group.
    Member,
    /// Driver of the ride.
    Driver,
    /// Holder of a seat on the ride.
    SeatHolder,
    /// Driver or seat holder.
    Participant,
    /// Anyone except the driver.
    NonDriver,
}

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LockGroup,
    DisbandGroup,
    ViewGroup,
    RequestSeat,
    DecideRider,
    MarkPaid,
    ReviewPayment,
    CloseRide,
    AttachQrCode,
    ViewRide,
}

impl Operation {
    /// Role the acting user must hold.
    pub fn required_role(&self) -> Role {
        match self {
            Operation::LockGroup | Operation::DisbandGroup => Role::Creator,
            Operation::ViewGroup => Role::Member,
            Operation::RequestSeat => Role::NonDriver,
            Operation::DecideRider
            | Operation::ReviewPayment
            | Operation::CloseRide
            | Operation::AttachQrCode => Role::Driver,
            Operation::MarkPaid => Role::SeatHolder,
            Operation::ViewRide => Role::Participant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LockGroup => "lock group",
            Operation::DisbandGroup => "disband group",
            Operation::ViewGroup => "view group",
            Operation::RequestSeat => "request seat",
            Operation::DecideRider => "decide rider request",
            Operation::MarkPaid => "mark seat paid",
            Operation::ReviewPayment => "review payment",
            Operation::CloseRide => "close ride",
            Operation::AttachQrCode => "attach payment qr code",
            Operation::ViewRide => "view ride",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Implemented by entities that can answer role queries.
pub trait Guarded {
    /// Returns true if `user` holds `role` on this entity.
    fn holds_role(&self, user: &UserId, role: Role) -> bool;
}

/// Checks that `actor` may perform `operation` on `entity`.
///
/// # Errors
///
/// - `Unauthorized` if the actor lacks the required role
pub fn guard<E: Guarded + ?Sized>(
    operation: Operation,
    actor: &UserId,
    entity: &E,
) -> Result<(), RideError> {
    if entity.holds_role(actor, operation.required_role()) {
        Ok(())
    } else {
        Err(RideError::unauthorized(actor, operation.as_str()))
    }
}
