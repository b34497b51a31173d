//! Group listing query handlers.

use std::sync::Arc;

use crate::domain::foundation::{RideError, UserId};
use crate::domain::projection::{groups_of, open_groups, GroupSummary};
use crate::ports::GroupReader;

/// Query for groups still accepting members.
#[derive(Debug, Clone, Default)]
pub struct ListOpenGroupsQuery;

/// Handler listing open groups, oldest first.
pub struct ListOpenGroupsHandler {
    reader: Arc<dyn GroupReader>,
}

impl ListOpenGroupsHandler {
    pub fn new(reader: Arc<dyn GroupReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, _query: ListOpenGroupsQuery) -> Result<Vec<GroupSummary>, RideError> {
        let groups = self.reader.list_open_groups().await?;
        Ok(open_groups(&groups))
    }
}

/// Query for every group a user belongs to, whatever its status.
#[derive(Debug, Clone)]
pub struct ListUserGroupsQuery {
    pub user_id: UserId,
}

/// Handler listing a user's groups.
pub struct ListUserGroupsHandler {
    reader: Arc<dyn GroupReader>,
}

impl ListUserGroupsHandler {
    pub fn new(reader: Arc<dyn GroupReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListUserGroupsQuery) -> Result<Vec<GroupSummary>, RideError> {
        let groups = self.reader.list_groups_for_user(&query.user_id).await?;
        Ok(groups_of(&query.user_id, &groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Harness};
    use crate::domain::lifecycle::GroupStatus;

    #[tokio::test]
    async fn open_listing_skips_locked_groups() {
        let harness = Harness::new();
        let open = harness.open_group("ana", 4, &["ben"]).await;
        harness.locked_group("cy", &["dee"]).await;
        let handler = ListOpenGroupsHandler::new(harness.store.clone());

        let rows = handler.handle(ListOpenGroupsQuery).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, open);
        assert_eq!(rows[0].open_seats, 2);
    }

    #[tokio::test]
    async fn user_listing_includes_every_status() {
        let harness = Harness::new();
        harness.open_group("ana", 4, &["ben"]).await;
        harness.locked_group("cy", &["ana"]).await;
        harness.open_group("dee", 3, &[]).await;
        let handler = ListUserGroupsHandler::new(harness.store.clone());

        let rows = handler
            .handle(ListUserGroupsQuery { user_id: user("ana") })
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r.status == GroupStatus::Open));
        assert!(rows.iter().any(|r| r.status == GroupStatus::Locked));
    }
}
