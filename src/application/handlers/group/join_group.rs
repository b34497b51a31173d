//! JoinGroupHandler - Command handler for joining an open group.
//!
//! The join that takes the last free seat also locks the group, so two
//! racing joins for one seat yield one member and one `GroupFull`.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{
    CommandMetadata, EventId, GroupId, RideError, Timestamp, UserId, Version,
};
use crate::domain::group::{Group, GroupLocked, MemberJoined};

/// Command to join a group.
#[derive(Debug, Clone)]
pub struct JoinGroupCommand {
    pub group_id: GroupId,
    pub user_id: UserId,
}

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct JoinGroupResult {
    pub group: Group,
    pub version: Version,
    /// The join filled the group and locked it.
    pub auto_locked: bool,
}

/// Handler for joining groups.
pub struct JoinGroupHandler {
    write_path: WritePath,
}

impl JoinGroupHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: JoinGroupCommand,
        metadata: CommandMetadata,
    ) -> Result<JoinGroupResult, RideError> {
        metadata.ensure_acting_user(&cmd.user_id, "join group")?;
        let committed = self
            .write_path
            .update_group(&cmd.group_id, &metadata, |group| {
                let outcome = group.join(cmd.user_id.clone())?;
                let now = Timestamp::now();

                let joined = MemberJoined {
                    event_id: EventId::new(),
                    group_id: *group.id(),
                    user_id: cmd.user_id.clone(),
                    member_count: group.member_count(),
                    joined_at: now,
                };
                let locked = outcome.auto_locked.then(|| GroupLocked {
                    event_id: EventId::new(),
                    group_id: *group.id(),
                    locked_by: cmd.user_id.clone(),
                    members: group.members().to_vec(),
                    automatic: true,
                    locked_at: now,
                });

                Ok(Staged::new((group.clone(), outcome.auto_locked))
                    .with_event(&joined)
                    .with_optional_event(locked.as_ref()))
            })
            .await?;

        let (group, auto_locked) = committed.output;
        Ok(JoinGroupResult {
            group,
            version: committed.version,
            auto_locked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{metadata, user, Harness};
    use crate::domain::group::GroupState;
    use crate::domain::lifecycle::GroupStatus;

    fn join(group_id: GroupId, who: &str) -> JoinGroupCommand {
        JoinGroupCommand {
            group_id,
            user_id: user(who),
        }
    }

    #[tokio::test]
    async fn join_adds_member_and_bumps_version() {
        let harness = Harness::new();
        let group_id = harness.open_group("ana", 3, &[]).await;
        let handler = JoinGroupHandler::new(harness.write_path.clone());

        let result = handler
            .handle(join(group_id, "ben"), metadata("ben"))
            .await
            .unwrap();

        assert!(!result.auto_locked);
        assert_eq!(result.version, Version::new(2));
        assert_eq!(harness.group(&group_id).await.members(), &[user("ana"), user("ben")]);
        assert_eq!(harness.bus.event_types(), vec!["group.member_joined.v1"]);
    }

    #[tokio::test]
    async fn last_seat_locks_group_and_publishes_both_events() {
        let harness = Harness::new();
        let group_id = harness.open_group("ana", 2, &[]).await;
        let handler = JoinGroupHandler::new(harness.write_path.clone());

        let result = handler
            .handle(join(group_id, "ben"), metadata("ben"))
            .await
            .unwrap();

        assert!(result.auto_locked);
        assert_eq!(
            harness.group(&group_id).await.state(),
            &GroupState::Locked {
                locked_by: user("ben"),
                ride_id: None
            }
        );
        assert_eq!(
            harness.bus.event_types(),
            vec!["group.member_joined.v1", "group.locked.v1"]
        );
        let locked = &harness.bus.events_of_type("group.locked.v1")[0];
        assert_eq!(locked.payload["automatic"], true);
    }

    #[tokio::test]
    async fn existing_member_is_rejected_before_capacity() {
        let harness = Harness::new();
        let group_id = harness.open_group("ana", 2, &["ben"]).await;
        let handler = JoinGroupHandler::new(harness.write_path.clone());

        let err = handler
            .handle(join(group_id, "ben"), metadata("ben"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RideError::AlreadyMember {
                group_id,
                user_id: user("ben")
            }
        );
    }

    #[tokio::test]
    async fn full_group_reports_full_not_closed() {
        let harness = Harness::new();
        let group_id = harness.open_group("ana", 2, &["ben"]).await;
        let handler = JoinGroupHandler::new(harness.write_path.clone());

        let err = handler
            .handle(join(group_id, "cy"), metadata("cy"))
            .await
            .unwrap_err();

        assert_eq!(err, RideError::GroupFull(group_id));
        assert_eq!(harness.group(&group_id).await.status(), GroupStatus::Locked);
    }

    #[tokio::test]
    async fn unknown_group_is_not_found() {
        let harness = Harness::new();
        let handler = JoinGroupHandler::new(harness.write_path.clone());
        let missing = GroupId::new();

        let err = handler
            .handle(join(missing, "ben"), metadata("ben"))
            .await
            .unwrap_err();

        assert_eq!(err, RideError::GroupNotFound(missing));
        assert_eq!(harness.bus.event_count(), 0);
    }
}
