//! In-memory group store.
//!
//! Keeps each group domain (group, optional ride, version) in a map behind a
//! tokio `RwLock`. Writes are compare-and-set on the domain version; the
//! write lock is only held for the comparison and the swap.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{GroupId, RideId, UserId, Version, Versioned};
use crate::domain::group::Group;
use crate::domain::lifecycle::GroupStatus;
use crate::domain::ride::Ride;
use crate::ports::{GroupReader, GroupStore, StoreError};

#[derive(Debug, Clone)]
struct Domain {
    group: Group,
    ride: Option<Ride>,
    version: Version,
}

#[derive(Debug, Default)]
struct State {
    domains: HashMap<GroupId, Domain>,
    ride_index: HashMap<RideId, GroupId>,
}

impl State {
    fn domain_mut(
        &mut self,
        group_id: &GroupId,
        expected: Version,
    ) -> Result<&mut Domain, StoreError> {
        let domain = self
            .domains
            .get_mut(group_id)
            .ok_or(StoreError::GroupNotFound(*group_id))?;
        if domain.version != expected {
            return Err(StoreError::ConcurrentModification {
                group_id: *group_id,
                expected,
                actual: domain.version,
            });
        }
        Ok(domain)
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored groups.
    pub async fn group_count(&self) -> usize {
        self.state.read().await.domains.len()
    }

    async fn snapshot_groups(&self, keep: impl Fn(&Group) -> bool) -> Vec<Group> {
        let state = self.state.read().await;
        let mut groups: Vec<Group> = state
            .domains
            .values()
            .map(|d| &d.group)
            .filter(|g| keep(g))
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.created_at().cmp(b.created_at()));
        groups
    }
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn insert_group(&self, group: &Group) -> Result<Version, StoreError> {
        let mut state = self.state.write().await;
        if state.domains.contains_key(group.id()) {
            return Err(StoreError::AlreadyExists(*group.id()));
        }
        state.domains.insert(
            *group.id(),
            Domain {
                group: group.clone(),
                ride: None,
                version: Version::INITIAL,
            },
        );
        Ok(Version::INITIAL)
    }

    async fn load_group(&self, id: &GroupId) -> Result<Option<Versioned<Group>>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .domains
            .get(id)
            .map(|d| Versioned::new(d.group.clone(), d.version)))
    }

    async fn save_group(&self, group: &Group, expected: Version) -> Result<Version, StoreError> {
        let mut state = self.state.write().await;
        let domain = state.domain_mut(group.id(), expected)?;
        domain.group = group.clone();
        domain.version = expected.next();
        Ok(domain.version)
    }

    async fn load_ride(&self, id: &RideId) -> Result<Option<Versioned<Ride>>, StoreError> {
        let state = self.state.read().await;
        let Some(group_id) = state.ride_index.get(id) else {
            return Ok(None);
        };
        Ok(state.domains.get(group_id).and_then(|d| {
            d.ride
                .as_ref()
                .map(|ride| Versioned::new(ride.clone(), d.version))
        }))
    }

    async fn save_ride(&self, ride: &Ride, expected: Version) -> Result<Version, StoreError> {
        let mut state = self.state.write().await;
        if !state.ride_index.contains_key(ride.id()) {
            return Err(StoreError::RideNotFound(*ride.id()));
        }
        let domain = state.domain_mut(ride.group_id(), expected)?;
        domain.ride = Some(ride.clone());
        domain.version = expected.next();
        Ok(domain.version)
    }

    async fn save_group_and_ride(
        &self,
        group: &Group,
        ride: &Ride,
        expected: Version,
    ) -> Result<Version, StoreError> {
        let mut state = self.state.write().await;
        let domain = state.domain_mut(group.id(), expected)?;
        domain.group = group.clone();
        domain.ride = Some(ride.clone());
        domain.version = expected.next();
        let version = domain.version;
        state.ride_index.insert(*ride.id(), *group.id());
        Ok(version)
    }
}

#[async_trait]
impl GroupReader for InMemoryGroupStore {
    async fn list_open_groups(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self
            .snapshot_groups(|g| g.status() == GroupStatus::Open)
            .await)
    }

    async fn list_groups_for_user(&self, user_id: &UserId) -> Result<Vec<Group>, StoreError> {
        Ok(self.snapshot_groups(|g| g.is_member(user_id)).await)
    }

    async fn get_group(&self, id: &GroupId) -> Result<Option<Versioned<Group>>, StoreError> {
        self.load_group(id).await
    }

    async fn get_ride(&self, id: &RideId) -> Result<Option<Versioned<Ride>>, StoreError> {
        self.load_ride(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn group(capacity: u32) -> Group {
        Group::create(GroupId::new(), user("ana"), capacity).unwrap()
    }

    #[tokio::test]
    async fn insert_then_load_returns_initial_version() {
        let store = InMemoryGroupStore::new();
        let g = group(3);

        let version = store.insert_group(&g).await.unwrap();
        let loaded = store.load_group(g.id()).await.unwrap().unwrap();

        assert_eq!(version, Version::INITIAL);
        assert_eq!(loaded.value, g);
        assert_eq!(loaded.version, Version::INITIAL);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryGroupStore::new();
        let g = group(3);
        store.insert_group(&g).await.unwrap();

        assert_eq!(
            store.insert_group(&g).await,
            Err(StoreError::AlreadyExists(*g.id()))
        );
    }

    #[tokio::test]
    async fn stale_save_fails_with_concurrent_modification() {
        let store = InMemoryGroupStore::new();
        let mut g = group(3);
        store.insert_group(&g).await.unwrap();

        g.join(user("ben")).unwrap();
        store.save_group(&g, Version::INITIAL).await.unwrap();

        let err = store.save_group(&g, Version::INITIAL).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::ConcurrentModification {
                group_id: *g.id(),
                expected: Version::INITIAL,
                actual: Version::new(2),
            }
        );
    }

    #[tokio::test]
    async fn ride_shares_the_group_version() {
        let store = InMemoryGroupStore::new();
        let mut g = group(2);
        let v1 = store.insert_group(&g).await.unwrap();
        g.join(user("ben")).unwrap();
        let ride_id = RideId::new();
        g.attach_ride(ride_id, &user("ana")).unwrap();
        let ride = Ride::for_group(ride_id, &g, user("ana"));

        let v2 = store.save_group_and_ride(&g, &ride, v1).await.unwrap();
        let loaded = store.load_ride(&ride_id).await.unwrap().unwrap();
        assert_eq!(loaded.version, v2);

        let v3 = store.save_ride(&ride, v2).await.unwrap();
        let group_after = store.load_group(g.id()).await.unwrap().unwrap();
        assert_eq!(group_after.version, v3);
        assert!(store.save_ride(&ride, v2).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn unknown_ride_cannot_be_saved() {
        let store = InMemoryGroupStore::new();
        let mut g = group(2);
        store.insert_group(&g).await.unwrap();
        g.join(user("ben")).unwrap();
        let ride_id = RideId::new();
        g.attach_ride(ride_id, &user("ana")).unwrap();
        let ride = Ride::for_group(ride_id, &g, user("ana"));

        assert_eq!(
            store.save_ride(&ride, Version::INITIAL).await,
            Err(StoreError::RideNotFound(ride_id))
        );
    }

    #[tokio::test]
    async fn reader_lists_open_groups_and_memberships() {
        let store = InMemoryGroupStore::new();
        let open = group(3);
        let mut full = Group::create(GroupId::new(), user("cy"), 2).unwrap();
        full.join(user("ana")).unwrap();
        store.insert_group(&open).await.unwrap();
        store.insert_group(&full).await.unwrap();

        let open_ids: Vec<_> = store
            .list_open_groups()
            .await
            .unwrap()
            .iter()
            .map(|g| *g.id())
            .collect();
        assert_eq!(open_ids, vec![*open.id()]);

        assert_eq!(store.list_groups_for_user(&user("ana")).await.unwrap().len(), 2);
        assert_eq!(store.list_groups_for_user(&user("cy")).await.unwrap().len(), 1);
    }
}
