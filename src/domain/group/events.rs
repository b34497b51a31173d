//! Group domain events.
//!
//! Events published when group lifecycle changes occur:
//! - `GroupCreated` - New open group
//! - `MemberJoined` - User joined an open group
//! - `MemberLeft` - User left an open group
//! - `GroupLocked` - Membership frozen (explicitly or by filling up)
//! - `GroupDisbanded` - Open group abandoned by its creator
//! - `GroupCompleted` - The group's ride closed

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, GroupId, RideId, Timestamp, UserId};

// ════════════════════════════════════════════════════════════════════════════
// GroupCreated
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCreated {
    pub event_id: EventId,
    pub group_id: GroupId,
    pub creator_id: UserId,
    pub capacity: u32,
    pub created_at: Timestamp,
}

domain_event!(
    GroupCreated,
    event_type = "group.created.v1",
    schema_version = 1,
    aggregate_id = group_id,
    aggregate_type = "Group",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// MemberJoined
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberJoined {
    pub event_id: EventId,
    pub group_id: GroupId,
    pub user_id: UserId,
    /// Member count after the join.
    pub member_count: usize,
    pub joined_at: Timestamp,
}

domain_event!(
    MemberJoined,
    event_type = "group.member_joined.v1",
    schema_version = 1,
    aggregate_id = group_id,
    aggregate_type = "Group",
    occurred_at = joined_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// MemberLeft
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberLeft {
    pub event_id: EventId,
    pub group_id: GroupId,
    pub user_id: UserId,
    /// Set when the departing user was the creator.
    pub new_creator_id: Option<UserId>,
    pub left_at: Timestamp,
}

domain_event!(
    MemberLeft,
    event_type = "group.member_left.v1",
    schema_version = 1,
    aggregate_id = group_id,
    aggregate_type = "Group",
    occurred_at = left_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// GroupLocked
// ════════════════════════════════════════════════════════════════════════════

/// Published when membership is frozen and a ride may be created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupLocked {
    pub event_id: EventId,
    pub group_id: GroupId,
    pub locked_by: UserId,
    pub members: Vec<UserId>,
    /// True when the lock came from the last free seat being taken.
    pub automatic: bool,
    pub locked_at: Timestamp,
}

domain_event!(
    GroupLocked,
    event_type = "group.locked.v1",
    schema_version = 1,
    aggregate_id = group_id,
    aggregate_type = "Group",
    occurred_at = locked_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// GroupDisbanded
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDisbanded {
    pub event_id: EventId,
    pub group_id: GroupId,
    pub disbanded_by: UserId,
    pub disbanded_at: Timestamp,
}

domain_event!(
    GroupDisbanded,
    event_type = "group.disbanded.v1",
    schema_version = 1,
    aggregate_id = group_id,
    aggregate_type = "Group",
    occurred_at = disbanded_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// GroupCompleted
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCompleted {
    pub event_id: EventId,
    pub group_id: GroupId,
    pub ride_id: RideId,
    pub completed_at: Timestamp,
}

domain_event!(
    GroupCompleted,
    event_type = "group.completed.v1",
    schema_version = 1,
    aggregate_id = group_id,
    aggregate_type = "Group",
    occurred_at = completed_at,
    event_id = event_id
);
