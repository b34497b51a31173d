//! LockGroupHandler - Command handler for freezing group membership.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{
    CommandMetadata, EventId, GroupId, RideError, Timestamp, UserId, Version,
};
use crate::domain::group::{Group, GroupLocked};
use crate::domain::lifecycle::Operation;

/// Command to lock a group. Only the creator may lock.
#[derive(Debug, Clone)]
pub struct LockGroupCommand {
    pub group_id: GroupId,
    pub requester_id: UserId,
}

/// Result of a successful lock.
#[derive(Debug, Clone)]
pub struct LockGroupResult {
    pub group: Group,
    pub version: Version,
}

/// Handler for locking groups.
pub struct LockGroupHandler {
    write_path: WritePath,
}

impl LockGroupHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: LockGroupCommand,
        metadata: CommandMetadata,
    ) -> Result<LockGroupResult, RideError> {
        metadata.ensure_acting_user(&cmd.requester_id, Operation::LockGroup.as_str())?;
        let committed = self
            .write_path
            .update_group(&cmd.group_id, &metadata, |group| {
                group.lock(&cmd.requester_id)?;
                let event = GroupLocked {
                    event_id: EventId::new(),
                    group_id: *group.id(),
                    locked_by: cmd.requester_id.clone(),
                    members: group.members().to_vec(),
                    automatic: false,
                    locked_at: Timestamp::now(),
                };
                Ok(Staged::new(group.clone()).with_event(&event))
            })
            .await?;

        Ok(LockGroupResult {
            group: committed.output,
            version: committed.version,
        })
    }
}
