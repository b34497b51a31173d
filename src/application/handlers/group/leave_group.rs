//! LeaveGroupHandler - Command handler for leaving an open group.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{
    CommandMetadata, EventId, GroupId, RideError, Timestamp, UserId, Version,
};
use crate::domain::group::{Group, MemberLeft};

/// Command to leave a group.
#[derive(Debug, Clone)]
pub struct LeaveGroupCommand {
    pub group_id: GroupId,
    pub user_id: UserId,
}

/// Result of a successful leave.
#[derive(Debug, Clone)]
pub struct LeaveGroupResult {
    pub group: Group,
    pub version: Version,
    pub event: MemberLeft,
}

/// Handler for leaving groups.
pub struct LeaveGroupHandler {
    write_path: WritePath,
}

impl LeaveGroupHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: LeaveGroupCommand,
        metadata: CommandMetadata,
    ) -> Result<LeaveGroupResult, RideError> {
        metadata.ensure_acting_user(&cmd.user_id, "leave group")?;
        let committed = self
            .write_path
            .update_group(&cmd.group_id, &metadata, |group| {
                let outcome = group.leave(&cmd.user_id)?;
                let event = MemberLeft {
                    event_id: EventId::new(),
                    group_id: *group.id(),
                    user_id: cmd.user_id.clone(),
                    new_creator_id: outcome.new_creator,
                    left_at: Timestamp::now(),
                };
                Ok(Staged::new((group.clone(), event.clone())).with_event(&event))
            })
            .await?;

        let (group, event) = committed.output;
        Ok(LeaveGroupResult {
            group,
            version: committed.version,
            event,
        })
    }
}
