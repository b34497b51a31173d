//! CreateGroupHandler - Command handler for opening a new group.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{CommandMetadata, EventId, GroupId, RideError, UserId, Version};
use crate::domain::group::{Group, GroupCreated};

/// Command to open a group with the creator as its first member.
#[derive(Debug, Clone)]
pub struct CreateGroupCommand {
    pub creator_id: UserId,
    pub capacity: u32,
}

/// Result of successful group creation.
#[derive(Debug, Clone)]
pub struct CreateGroupResult {
    pub group: Group,
    pub version: Version,
    pub event: GroupCreated,
}

/// Handler for creating groups.
pub struct CreateGroupHandler {
    write_path: WritePath,
}

impl CreateGroupHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: CreateGroupCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateGroupResult, RideError> {
        metadata.ensure_acting_user(&cmd.creator_id, "create group")?;
        let group = Group::create(GroupId::new(), cmd.creator_id, cmd.capacity)?;

        let event = GroupCreated {
            event_id: EventId::new(),
            group_id: *group.id(),
            creator_id: group.creator_id().clone(),
            capacity: group.capacity(),
            created_at: *group.created_at(),
        };

        let committed = self
            .write_path
            .insert_group(&group, Staged::new(()).with_event(&event), &metadata)
            .await?;

        Ok(CreateGroupResult {
            group,
            version: committed.version,
            event,
        })
    }
}
