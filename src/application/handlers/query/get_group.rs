//! GetGroupHandler - Member-only view of one group.

use std::sync::Arc;

use crate::domain::foundation::{GroupId, RideError, UserId};
use crate::domain::projection::{group_view, GroupView};
use crate::ports::GroupReader;

#[derive(Debug, Clone)]
pub struct GetGroupQuery {
    pub group_id: GroupId,
    pub user_id: UserId,
}

pub struct GetGroupHandler {
    reader: Arc<dyn GroupReader>,
}

impl GetGroupHandler {
    pub fn new(reader: Arc<dyn GroupReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetGroupQuery) -> Result<GroupView, RideError> {
        let group = self
            .reader
            .get_group(&query.group_id)
            .await?
            .ok_or(RideError::GroupNotFound(query.group_id))?;
        group_view(&query.user_id, &group)
    }
}
