//! Status enums for groups, rides and rider seats, with their transition graphs.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a ride group.
///
/// Advances Open -> Locked -> Completed, or Open -> Disbanded. Never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    #[default]
    Open,
    Locked,
    Completed,
    Disbanded,
}

impl GroupStatus {
    /// Returns true if membership may still change.
    pub fn accepts_members(&self) -> bool {
        matches!(self, GroupStatus::Open)
    }

    /// Position along the lifecycle; never decreases.
    pub fn rank(&self) -> u8 {
        match self {
            GroupStatus::Open => 0,
            GroupStatus::Locked => 1,
            GroupStatus::Completed | GroupStatus::Disbanded => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Open => "open",
            GroupStatus::Locked => "locked",
            GroupStatus::Completed => "completed",
            GroupStatus::Disbanded => "disbanded",
        }
    }
}

impl StateMachine for GroupStatus {
    const ENTITY: &'static str = "group";

    fn can_transition_to(&self, target: &Self) -> bool {
        use GroupStatus::*;
        matches!(
            (self, target),
            (Open, Locked) | (Open, Disbanded) | (Locked, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use GroupStatus::*;
        match self {
            Open => vec![Locked, Disbanded],
            Locked => vec![Completed],
            Completed | Disbanded => vec![],
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    #[default]
    Active,
    Closed,
}

impl StateMachine for RideStatus {
    const ENTITY: &'static str = "ride";

    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (RideStatus::Active, RideStatus::Closed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            RideStatus::Active => vec![RideStatus::Closed],
            RideStatus::Closed => vec![],
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RideStatus::Active => "active",
            RideStatus::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

/// Driver decision state of a seat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Requested,
    Accepted,
    Declined,
}

impl StateMachine for RequestState {
    const ENTITY: &'static str = "seat request";

    fn can_transition_to(&self, target: &Self) -> bool {
        use RequestState::*;
        matches!((self, target), (Requested, Accepted) | (Requested, Declined))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            RequestState::Requested => vec![RequestState::Accepted, RequestState::Declined],
            RequestState::Accepted | RequestState::Declined => vec![],
        }
    }
}

/// Payment state of an accepted seat.
///
/// `NotApplicable` until the seat is accepted; `Verified` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    #[default]
    NotApplicable,
    Pending,
    MarkedPaid,
    Verified,
    Rejected,
}

impl StateMachine for PaymentState {
    const ENTITY: &'static str = "payment";

    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentState::*;
        matches!(
            (self, target),
            (NotApplicable, Pending)
                | (Pending, MarkedPaid)
                | (MarkedPaid, Verified)
                | (MarkedPaid, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentState::*;
        match self {
            NotApplicable => vec![Pending],
            Pending => vec![MarkedPaid],
            MarkedPaid => vec![Verified, Rejected],
            Verified | Rejected => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GROUP_STATUSES: [GroupStatus; 4] = [
        GroupStatus::Open,
        GroupStatus::Locked,
        GroupStatus::Completed,
        GroupStatus::Disbanded,
    ];

    const PAYMENT_STATES: [PaymentState; 5] = [
        PaymentState::NotApplicable,
        PaymentState::Pending,
        PaymentState::MarkedPaid,
        PaymentState::Verified,
        PaymentState::Rejected,
    ];

    #[test]
    fn group_status_cannot_return_to_open() {
        for status in GROUP_STATUSES {
            if status != GroupStatus::Open {
                assert!(!status.can_transition_to(&GroupStatus::Open));
            }
        }
    }

    #[test]
    fn completed_and_disbanded_are_terminal() {
        assert!(GroupStatus::Completed.is_terminal());
        assert!(GroupStatus::Disbanded.is_terminal());
        assert!(!GroupStatus::Locked.is_terminal());
    }

    #[test]
    fn only_open_accepts_members() {
        assert!(GroupStatus::Open.accepts_members());
        assert!(!GroupStatus::Locked.accepts_members());
        assert!(!GroupStatus::Completed.accepts_members());
    }

    #[test]
    fn closed_ride_is_terminal() {
        assert!(RideStatus::Closed.is_terminal());
        assert!(RideStatus::Active
            .transition_to(RideStatus::Closed)
            .is_ok());
        assert!(RideStatus::Closed
            .transition_to(RideStatus::Active)
            .is_err());
    }

    #[test]
    fn verified_and_rejected_are_terminal() {
        assert!(PaymentState::Verified.is_terminal());
        assert!(PaymentState::Rejected.is_terminal());
    }

    #[test]
    fn requested_cannot_skip_to_verified() {
        assert!(PaymentState::Pending
            .transition_to(PaymentState::Verified)
            .is_err());
        assert!(PaymentState::NotApplicable
            .transition_to(PaymentState::MarkedPaid)
            .is_err());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in PAYMENT_STATES {
            for to in PAYMENT_STATES {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    fn group_status() -> impl Strategy<Value = GroupStatus> {
        prop::sample::select(GROUP_STATUSES.to_vec())
    }

    proptest! {
        #[test]
        fn group_status_rank_never_decreases(
            start in group_status(),
            targets in prop::collection::vec(group_status(), 0..12),
        ) {
            let mut current = start;
            for target in targets {
                if let Ok(next) = current.transition_to(target) {
                    prop_assert!(next.rank() > current.rank());
                    current = next;
                } else {
                    prop_assert!(!current.can_transition_to(&target));
                }
            }
        }
    }
}
