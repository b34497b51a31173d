//! Group store port (write side).
//!
//! A group and its ride form one mutation domain sharing a single version.
//! Every write names the version it was computed from and fails with
//! `StoreError::ConcurrentModification` if another write committed first.
//!
//! # Design
//!
//! - **Version-checked**: compare-and-set on the domain version, no locks held
//!   while domain logic runs
//! - **Atomic pairs**: `save_group_and_ride` commits both entities or neither

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{GroupId, RideError, RideId, Version, Versioned};
use crate::domain::group::Group;
use crate::domain::ride::Ride;

/// Failures reported by a group store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("group {0} already exists")]
    AlreadyExists(GroupId),

    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("ride {0} not found")]
    RideNotFound(RideId),

    #[error("group {group_id} changed concurrently: expected {expected}, found {actual}")]
    ConcurrentModification {
        group_id: GroupId,
        expected: Version,
        actual: Version,
    },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::ConcurrentModification { .. })
    }
}

impl From<StoreError> for RideError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::GroupNotFound(id) => RideError::GroupNotFound(id),
            StoreError::RideNotFound(id) => RideError::RideNotFound(id),
            StoreError::ConcurrentModification { group_id, .. } => {
                RideError::ConcurrentModification {
                    group_id,
                    attempts: 1,
                }
            }
            other @ (StoreError::AlreadyExists(_) | StoreError::Backend(_)) => {
                RideError::Infrastructure(other.to_string())
            }
        }
    }
}

/// Store port for group mutation domains.
///
/// Versions returned by `load_*` and the save methods are domain versions:
/// the ride's version is always its group's version.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Insert a new group at `Version::INITIAL`.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the id is taken
    async fn insert_group(&self, group: &Group) -> Result<Version, StoreError>;

    /// Load a group with its domain version. Returns `None` if not found.
    async fn load_group(&self, id: &GroupId) -> Result<Option<Versioned<Group>>, StoreError>;

    /// Replace a group, returning the new domain version.
    ///
    /// # Errors
    ///
    /// - `GroupNotFound` if the group doesn't exist
    /// - `ConcurrentModification` if `expected` is stale
    async fn save_group(&self, group: &Group, expected: Version) -> Result<Version, StoreError>;

    /// Load a ride with its group's domain version. Returns `None` if not found.
    async fn load_ride(&self, id: &RideId) -> Result<Option<Versioned<Ride>>, StoreError>;

    /// Replace an existing ride, returning the new domain version.
    ///
    /// # Errors
    ///
    /// - `RideNotFound` if the ride doesn't exist
    /// - `ConcurrentModification` if `expected` is stale
    async fn save_ride(&self, ride: &Ride, expected: Version) -> Result<Version, StoreError>;

    /// Commit a group and its ride together. The ride is inserted if new.
    ///
    /// # Errors
    ///
    /// - `GroupNotFound` if the group doesn't exist
    /// - `ConcurrentModification` if `expected` is stale
    async fn save_group_and_ride(
        &self,
        group: &Group,
        ride: &Ride,
        expected: Version,
    ) -> Result<Version, StoreError>;
}
