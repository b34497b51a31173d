//! Lifecycle engine.
//!
//! Owns every rule that decides whether a group, ride or seat may change:
//! status transition graphs, the seat state machine, the authorization
//! guard and the settlement check. Aggregates consult these rules before
//! mutating and never decide invariants on their own.

pub mod group_rules;
pub mod ride_rules;

mod guard;
mod seat_rules;
mod state_machine;
mod statuses;

pub use guard::{guard, Guarded, Operation, Role};
pub use seat_rules::{
    next_seat_state, occupies_seat, standing, RiderDecision, SeatAction, SeatStanding,
};
pub use state_machine::StateMachine;
pub use statuses::{GroupStatus, PaymentState, RequestState, RideStatus};
