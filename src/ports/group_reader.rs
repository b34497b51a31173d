//! Group reader port (read side).
//!
//! Serves committed snapshots to the query layer. Readers never take part
//! in the version-checked write path.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::foundation::{GroupId, RideId, UserId, Versioned};
use crate::domain::group::Group;
use crate::domain::ride::Ride;

/// Reader port for group and ride snapshots.
#[async_trait]
pub trait GroupReader: Send + Sync {
    /// Groups whose status is Open.
    async fn list_open_groups(&self) -> Result<Vec<Group>, StoreError>;

    /// Groups that list `user_id` as a member, any status.
    async fn list_groups_for_user(&self, user_id: &UserId) -> Result<Vec<Group>, StoreError>;

    /// Returns `None` if not found.
    async fn get_group(&self, id: &GroupId) -> Result<Option<Versioned<Group>>, StoreError>;

    /// Returns `None` if not found.
    async fn get_ride(&self, id: &RideId) -> Result<Option<Versioned<Ride>>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn GroupReader) {}
    }
}
