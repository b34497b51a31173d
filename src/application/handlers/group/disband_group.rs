//! DisbandGroupHandler - Command handler for abandoning an open group.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{
    CommandMetadata, EventId, GroupId, RideError, Timestamp, UserId, Version,
};
use crate::domain::group::{Group, GroupDisbanded};
use crate::domain::lifecycle::Operation;

/// Command to disband a group. Only the creator may disband.
#[derive(Debug, Clone)]
pub struct DisbandGroupCommand {
    pub group_id: GroupId,
    pub requester_id: UserId,
}

#[derive(Debug, Clone)]
pub struct DisbandGroupResult {
    pub group: Group,
    pub version: Version,
}

/// Handler for disbanding groups.
pub struct DisbandGroupHandler {
    write_path: WritePath,
}

impl DisbandGroupHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: DisbandGroupCommand,
        metadata: CommandMetadata,
    ) -> Result<DisbandGroupResult, RideError> {
        metadata.ensure_acting_user(&cmd.requester_id, Operation::DisbandGroup.as_str())?;
        let committed = self
            .write_path
            .update_group(&cmd.group_id, &metadata, |group| {
                group.disband(&cmd.requester_id)?;
                let event = GroupDisbanded {
                    event_id: EventId::new(),
                    group_id: *group.id(),
                    disbanded_by: cmd.requester_id.clone(),
                    disbanded_at: Timestamp::now(),
                };
                Ok(Staged::new(group.clone()).with_event(&event))
            })
            .await?;

        Ok(DisbandGroupResult {
            group: committed.output,
            version: committed.version,
        })
    }
}
