//! Group aggregate entity.
//!
//! A group is the set of users intending to share one ride. It exclusively
//! owns its member list and moves through Open -> Locked -> Completed.
//!
//! # Ownership
//!
//! Groups reference their ride by ID only. The ride is stored alongside the
//! group and mutated under the same version.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{GroupId, RideError, RideId, Timestamp, UserId};
use crate::domain::lifecycle::{group_rules, GroupStatus, Guarded, Role};

/// Lifecycle state of a group.
///
/// The ride id lives inside the variant so that "a ride exists" and
/// "the group is locked or completed" cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupState {
    Open,
    Locked {
        locked_by: UserId,
        ride_id: Option<RideId>,
    },
    Completed {
        ride_id: RideId,
    },
    Disbanded,
}

impl GroupState {
    pub fn status(&self) -> GroupStatus {
        match self {
            GroupState::Open => GroupStatus::Open,
            GroupState::Locked { .. } => GroupStatus::Locked,
            GroupState::Completed { .. } => GroupStatus::Completed,
            GroupState::Disbanded => GroupStatus::Disbanded,
        }
    }

    pub fn ride_id(&self) -> Option<RideId> {
        match self {
            GroupState::Locked { ride_id, .. } => *ride_id,
            GroupState::Completed { ride_id } => Some(*ride_id),
            GroupState::Open | GroupState::Disbanded => None,
        }
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The join filled the group and locked it.
    pub auto_locked: bool,
}

/// Result of a successful leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// Set when the creator left and the role passed to the earliest member.
    pub new_creator: Option<UserId>,
}

/// Group aggregate.
///
/// # Invariants
///
/// - `members` is unique, never empty, and never longer than `capacity`
/// - `capacity` is at least 2
/// - status only advances (see [`GroupStatus`])
/// - only open groups change membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    creator_id: UserId,
    capacity: u32,
    /// Members in join order.
    members: Vec<UserId>,
    state: GroupState,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Group {
    /// Create a new open group with the creator as sole member.
    ///
    /// # Errors
    ///
    /// - `InvalidCapacity` if capacity < 2
    pub fn create(id: GroupId, creator_id: UserId, capacity: u32) -> Result<Self, RideError> {
        group_rules::check_capacity(capacity)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            members: vec![creator_id.clone()],
            creator_id,
            capacity,
            state: GroupState::Open,
            created_at: now,
            updated_at: now,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.contains(user_id)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity as usize
    }

    pub fn state(&self) -> &GroupState {
        &self.state
    }

    pub fn status(&self) -> GroupStatus {
        self.state.status()
    }

    /// Returns the ride created for this group, if any.
    pub fn ride_id(&self) -> Option<RideId> {
        self.state.ride_id()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a member. Filling the last seat locks the group in the same step.
    ///
    /// # Errors
    ///
    /// - `AlreadyMember`, `GroupFull`, `GroupNotOpen`
    pub fn join(&mut self, user_id: UserId) -> Result<JoinOutcome, RideError> {
        group_rules::check_join(self, &user_id)?;

        self.members.push(user_id.clone());
        let auto_locked = self.is_full();
        if auto_locked {
            self.state = GroupState::Locked {
                locked_by: user_id,
                ride_id: None,
            };
        }
        self.touch();
        Ok(JoinOutcome { auto_locked })
    }

    /// Remove a member. A departing creator hands the role to the earliest
    /// remaining member.
    ///
    /// # Errors
    ///
    /// - `GroupNotOpen`, `NotMember`, `CreatorCannotLeaveAlone`
    pub fn leave(&mut self, user_id: &UserId) -> Result<LeaveOutcome, RideError> {
        group_rules::check_leave(self, user_id)?;

        self.members.retain(|member| member != user_id);
        let new_creator = if &self.creator_id == user_id {
            self.creator_id = self.members[0].clone();
            Some(self.creator_id.clone())
        } else {
            None
        };
        self.touch();
        Ok(LeaveOutcome { new_creator })
    }

    /// Lock membership so a ride can be created.
    ///
    /// # Errors
    ///
    /// - `Unauthorized`, `GroupNotOpen`, `InsufficientMembers`
    pub fn lock(&mut self, requester: &UserId) -> Result<(), RideError> {
        group_rules::check_lock(self, requester)?;

        self.state = GroupState::Locked {
            locked_by: requester.clone(),
            ride_id: None,
        };
        self.touch();
        Ok(())
    }

    /// Abandon an open group.
    ///
    /// # Errors
    ///
    /// - `Unauthorized`, `GroupNotOpen`
    pub fn disband(&mut self, requester: &UserId) -> Result<(), RideError> {
        group_rules::check_disband(self, requester)?;

        self.state = GroupState::Disbanded;
        self.touch();
        Ok(())
    }

    /// Record the ride created for this locked group.
    ///
    /// # Errors
    ///
    /// - `GroupNotLocked`, `RideAlreadyExists`, `NotMember`
    pub fn attach_ride(&mut self, ride_id: RideId, driver: &UserId) -> Result<(), RideError> {
        group_rules::check_create_ride(self, driver)?;

        if let GroupState::Locked { ride_id: slot, .. } = &mut self.state {
            *slot = Some(ride_id);
        }
        self.touch();
        Ok(())
    }

    /// Mark the group completed once its ride closes.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless locked on `ride_id`
    pub fn complete(&mut self, ride_id: RideId) -> Result<(), RideError> {
        group_rules::check_complete(self, &ride_id)?;

        self.state = GroupState::Completed { ride_id };
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl Guarded for Group {
    fn holds_role(&self, user: &UserId, role: Role) -> bool {
        match role {
            Role::Creator => &self.creator_id == user,
            Role::Member | Role::Participant => self.is_member(user),
            Role::Driver | Role::SeatHolder | Role::NonDriver => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn open_group(capacity: u32) -> Group {
        Group::create(GroupId::new(), user("creator"), capacity).unwrap()
    }

    // Construction tests

    #[test]
    fn new_group_is_open_with_creator_only() {
        let group = open_group(3);
        assert_eq!(group.status(), GroupStatus::Open);
        assert_eq!(group.members(), &[user("creator")]);
        assert!(group.ride_id().is_none());
    }

    #[test]
    fn create_rejects_capacity_below_two() {
        assert_eq!(
            Group::create(GroupId::new(), user("creator"), 1),
            Err(RideError::InvalidCapacity { min: 2, actual: 1 })
        );
    }

    // Join tests

    #[test]
    fn join_adds_member_without_locking_when_room_remains() {
        let mut group = open_group(3);
        let outcome = group.join(user("ana")).unwrap();
        assert!(!outcome.auto_locked);
        assert_eq!(group.member_count(), 2);
        assert_eq!(group.status(), GroupStatus::Open);
    }

    #[test]
    fn filling_last_seat_auto_locks() {
        let mut group = open_group(2);
        let outcome = group.join(user("ana")).unwrap();
        assert!(outcome.auto_locked);
        assert_eq!(
            group.state(),
            &GroupState::Locked {
                locked_by: user("ana"),
                ride_id: None
            }
        );
    }

    #[test]
    fn join_on_full_group_fails_and_leaves_members_unchanged() {
        let mut group = open_group(2);
        group.join(user("ana")).unwrap();
        let before = group.clone();

        assert_eq!(group.join(user("ben")), Err(RideError::GroupFull(*group.id())));
        assert_eq!(group, before);
    }

    // Leave tests

    #[test]
    fn creator_cannot_leave_alone() {
        let mut group = open_group(3);
        assert_eq!(
            group.leave(&user("creator")),
            Err(RideError::CreatorCannotLeaveAlone(*group.id()))
        );
    }

    #[test]
    fn departing_creator_hands_over_to_earliest_member() {
        let mut group = open_group(4);
        group.join(user("ana")).unwrap();
        group.join(user("ben")).unwrap();

        let outcome = group.leave(&user("creator")).unwrap();

        assert_eq!(outcome.new_creator, Some(user("ana")));
        assert_eq!(group.creator_id(), &user("ana"));
        assert_eq!(group.members(), &[user("ana"), user("ben")]);
    }

    #[test]
    fn non_member_cannot_leave() {
        let mut group = open_group(3);
        assert!(matches!(
            group.leave(&user("stranger")),
            Err(RideError::NotMember { .. })
        ));
    }

    #[test]
    fn members_cannot_leave_locked_group() {
        let mut group = open_group(2);
        group.join(user("ana")).unwrap();
        assert_eq!(
            group.leave(&user("ana")),
            Err(RideError::GroupNotOpen(*group.id()))
        );
    }

    // Lock tests

    #[test]
    fn creator_locks_group_with_two_members() {
        let mut group = open_group(4);
        group.join(user("ana")).unwrap();
        group.lock(&user("creator")).unwrap();
        assert_eq!(group.status(), GroupStatus::Locked);
    }

    #[test]
    fn locking_twice_fails_as_not_open() {
        let mut group = open_group(4);
        group.join(user("ana")).unwrap();
        group.lock(&user("creator")).unwrap();
        assert_eq!(
            group.lock(&user("creator")),
            Err(RideError::GroupNotOpen(*group.id()))
        );
    }

    // Disband tests

    #[test]
    fn disbanded_group_rejects_joins() {
        let mut group = open_group(3);
        group.disband(&user("creator")).unwrap();
        assert_eq!(group.status(), GroupStatus::Disbanded);
        assert_eq!(
            group.join(user("ana")),
            Err(RideError::GroupNotOpen(*group.id()))
        );
    }

    // Ride linkage tests

    #[test]
    fn attach_then_complete() {
        let mut group = open_group(2);
        group.join(user("ana")).unwrap();
        let ride_id = RideId::new();

        group.attach_ride(ride_id, &user("creator")).unwrap();
        assert_eq!(group.ride_id(), Some(ride_id));

        group.complete(ride_id).unwrap();
        assert_eq!(group.state(), &GroupState::Completed { ride_id });
    }

    #[test]
    fn second_ride_is_rejected() {
        let mut group = open_group(2);
        group.join(user("ana")).unwrap();
        let first = RideId::new();
        group.attach_ride(first, &user("creator")).unwrap();

        assert_eq!(
            group.attach_ride(RideId::new(), &user("ana")),
            Err(RideError::RideAlreadyExists {
                group_id: *group.id(),
                ride_id: first
            })
        );
    }

    #[test]
    fn state_serializes_with_status_tag() {
        let json = serde_json::to_value(GroupState::Open).unwrap();
        assert_eq!(json["status"], "open");
    }
}
