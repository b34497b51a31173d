//! Preconditions for group lifecycle transitions.
//!
//! Each check returns the typed failure for the first violated rule and
//! never mutates. The `Group` aggregate calls these before applying a change.

use super::{guard, GroupStatus, Operation, StateMachine};
use crate::domain::foundation::{RideError, RideId, UserId};
use crate::domain::group::Group;

/// Smallest group that can share a ride: a driver and one rider.
pub const MIN_GROUP_CAPACITY: u32 = 2;

/// Minimum members required to lock a group.
pub const MIN_MEMBERS_TO_LOCK: usize = 2;

/// # Errors
///
/// - `InvalidCapacity` if capacity is below [`MIN_GROUP_CAPACITY`]
pub fn check_capacity(capacity: u32) -> Result<(), RideError> {
    if capacity < MIN_GROUP_CAPACITY {
        return Err(RideError::InvalidCapacity {
            min: MIN_GROUP_CAPACITY,
            actual: capacity,
        });
    }
    Ok(())
}

/// Checks a join. A full group reports `GroupFull` even after it auto-locked,
/// so racing joiners see why they lost.
///
/// # Errors
///
/// - `AlreadyMember` if the user is already in the group
/// - `GroupFull` if the member count has reached capacity
/// - `GroupNotOpen` if the group is locked, completed or disbanded
pub fn check_join(group: &Group, user: &UserId) -> Result<(), RideError> {
    if group.is_member(user) {
        return Err(RideError::AlreadyMember {
            group_id: *group.id(),
            user_id: user.clone(),
        });
    }
    if group.is_full() {
        return Err(RideError::GroupFull(*group.id()));
    }
    if !group.status().accepts_members() {
        return Err(RideError::GroupNotOpen(*group.id()));
    }
    Ok(())
}

/// # Errors
///
/// - `GroupNotOpen` if membership is frozen
/// - `NotMember` if the user is not in the group
/// - `CreatorCannotLeaveAlone` if the creator is the last member
pub fn check_leave(group: &Group, user: &UserId) -> Result<(), RideError> {
    if !group.status().accepts_members() {
        return Err(RideError::GroupNotOpen(*group.id()));
    }
    if !group.is_member(user) {
        return Err(RideError::NotMember {
            group_id: *group.id(),
            user_id: user.clone(),
        });
    }
    if group.creator_id() == user && group.member_count() == 1 {
        return Err(RideError::CreatorCannotLeaveAlone(*group.id()));
    }
    Ok(())
}

/// # Errors
///
/// - `Unauthorized` if the requester is not the creator
/// - `GroupNotOpen` if the group is not open
/// - `InsufficientMembers` if fewer than two members joined
pub fn check_lock(group: &Group, requester: &UserId) -> Result<(), RideError> {
    guard(Operation::LockGroup, requester, group)?;
    advance(group, GroupStatus::Locked)?;
    if group.member_count() < MIN_MEMBERS_TO_LOCK {
        return Err(RideError::InsufficientMembers {
            group_id: *group.id(),
            members: group.member_count(),
        });
    }
    Ok(())
}

/// # Errors
///
/// - `Unauthorized` if the requester is not the creator
/// - `GroupNotOpen` if the group is not open
pub fn check_disband(group: &Group, requester: &UserId) -> Result<(), RideError> {
    guard(Operation::DisbandGroup, requester, group)?;
    advance(group, GroupStatus::Disbanded)?;
    Ok(())
}

/// # Errors
///
/// - `GroupNotLocked` if the group is open, completed or disbanded
/// - `RideAlreadyExists` if a ride was already created for the group
/// - `NotMember` if the driver is not a member
pub fn check_create_ride(group: &Group, driver: &UserId) -> Result<(), RideError> {
    if group.status() != GroupStatus::Locked {
        return Err(RideError::GroupNotLocked(*group.id()));
    }
    if let Some(ride_id) = group.ride_id() {
        return Err(RideError::RideAlreadyExists {
            group_id: *group.id(),
            ride_id,
        });
    }
    if !group.is_member(driver) {
        return Err(RideError::NotMember {
            group_id: *group.id(),
            user_id: driver.clone(),
        });
    }
    Ok(())
}

/// # Errors
///
/// - `InvalidTransition` unless the group is locked on exactly this ride
pub fn check_complete(group: &Group, ride_id: &RideId) -> Result<(), RideError> {
    advance(group, GroupStatus::Completed)?;
    if group.ride_id().as_ref() != Some(ride_id) {
        return Err(RideError::invalid_transition(
            "group",
            group.status(),
            GroupStatus::Completed,
        ));
    }
    Ok(())
}

/// Validates a status advance; leaving Open maps to `GroupNotOpen`.
fn advance(group: &Group, target: GroupStatus) -> Result<GroupStatus, RideError> {
    let current = group.status();
    current.transition_to(target).map_err(|err| {
        if target == GroupStatus::Locked || target == GroupStatus::Disbanded {
            RideError::GroupNotOpen(*group.id())
        } else {
            err
        }
    })
}
