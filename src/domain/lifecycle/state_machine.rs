//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions across group, ride and seat statuses.

use crate::domain::foundation::RideError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// let next = GroupStatus::Open.transition_to(GroupStatus::Locked)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Entity name used in `InvalidTransition` errors.
    const ENTITY: &'static str;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, RideError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(RideError::invalid_transition(Self::ENTITY, self, target))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
