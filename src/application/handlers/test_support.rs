//! Fixtures shared by handler tests.

use std::sync::Arc;

use crate::adapters::{InMemoryEventBus, InMemoryGroupStore};
use crate::application::WritePath;
use crate::config::EngineConfig;
use crate::domain::foundation::{CommandMetadata, GroupId, RideId, UserId};
use crate::domain::group::Group;
use crate::domain::ride::Ride;
use crate::ports::GroupStore;

pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn metadata(actor: &str) -> CommandMetadata {
    CommandMetadata::new(user(actor)).with_correlation_id(format!("corr-{actor}"))
}

pub struct Harness {
    pub store: Arc<InMemoryGroupStore>,
    pub bus: Arc<InMemoryEventBus>,
    pub write_path: WritePath,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryGroupStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let write_path = WritePath::new(store.clone(), bus.clone(), &EngineConfig::default());
        Self {
            store,
            bus,
            write_path,
        }
    }

    /// Stores an open group created by `creator` with `members` joined.
    pub async fn open_group(&self, creator: &str, capacity: u32, members: &[&str]) -> GroupId {
        let mut group = Group::create(GroupId::new(), user(creator), capacity).unwrap();
        for member in members {
            group.join(user(member)).unwrap();
        }
        self.store.insert_group(&group).await.unwrap();
        *group.id()
    }

    /// Stores a full, auto-locked group.
    pub async fn locked_group(&self, creator: &str, members: &[&str]) -> GroupId {
        self.open_group(creator, members.len() as u32 + 1, members)
            .await
    }

    /// Stores a locked group with an active ride driven by `driver`.
    pub async fn active_ride(&self, creator: &str, members: &[&str], driver: &str) -> RideId {
        let group_id = self.locked_group(creator, members).await;
        let snapshot = self.store.load_group(&group_id).await.unwrap().unwrap();
        let mut group = snapshot.value;
        let ride_id = RideId::new();
        group.attach_ride(ride_id, &user(driver)).unwrap();
        let ride = Ride::for_group(ride_id, &group, user(driver));
        self.store
            .save_group_and_ride(&group, &ride, snapshot.version)
            .await
            .unwrap();
        ride_id
    }

    pub async fn group(&self, id: &GroupId) -> Group {
        self.store.load_group(id).await.unwrap().unwrap().value
    }

    pub async fn ride(&self, id: &RideId) -> Ride {
        self.store.load_ride(id).await.unwrap().unwrap().value
    }

    /// Applies `mutate` to a stored ride outside of any handler.
    pub async fn edit_ride(&self, id: &RideId, mutate: impl FnOnce(&mut Ride)) {
        let snapshot = self.store.load_ride(id).await.unwrap().unwrap();
        let mut ride = snapshot.value;
        mutate(&mut ride);
        self.store.save_ride(&ride, snapshot.version).await.unwrap();
    }
}
