//! Shared optimistic write path.
//!
//! Every command runs the same loop: load the domain snapshot and its
//! version, apply a synchronous domain transition to a copy, save with the
//! version read. A version conflict reloads and re-applies, up to the
//! configured attempt limit. Events are published only after the commit and
//! a publication failure never undoes it.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::foundation::{
    CommandMetadata, EventEnvelope, GroupId, RideError, RideId, SerializableDomainEvent, Version,
};
use crate::domain::group::Group;
use crate::domain::ride::Ride;
use crate::ports::{EventPublisher, GroupStore, StoreError};

/// Result of one domain transition, before it is committed.
#[derive(Debug)]
pub struct Staged<T> {
    output: T,
    events: Vec<EventEnvelope>,
}

impl<T> Staged<T> {
    pub fn new(output: T) -> Self {
        Self {
            output,
            events: Vec::new(),
        }
    }

    /// Queue an event to publish once the transition commits.
    pub fn with_event<E: SerializableDomainEvent>(mut self, event: &E) -> Self {
        self.events.push(event.to_envelope());
        self
    }

    /// Queue an event only when present.
    pub fn with_optional_event<E: SerializableDomainEvent>(self, event: Option<&E>) -> Self {
        match event {
            Some(event) => self.with_event(event),
            None => self,
        }
    }
}

/// A committed write and the domain version it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<T> {
    pub output: T,
    pub version: Version,
}

/// Load, mutate, version-checked save, publish.
#[derive(Clone)]
pub struct WritePath {
    store: Arc<dyn GroupStore>,
    event_publisher: Arc<dyn EventPublisher>,
    max_attempts: u32,
}

impl WritePath {
    pub fn new(
        store: Arc<dyn GroupStore>,
        event_publisher: Arc<dyn EventPublisher>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store,
            event_publisher,
            max_attempts: config.max_write_attempts.max(1),
        }
    }

    /// Persist a brand new group.
    pub async fn insert_group<T>(
        &self,
        group: &Group,
        staged: Staged<T>,
        metadata: &CommandMetadata,
    ) -> Result<Committed<T>, RideError> {
        let version = self.store.insert_group(group).await?;
        info!(group_id = %group.id(), %version, "group created");
        Ok(self.commit(staged, version, metadata).await)
    }

    /// Apply `mutate` to a group and save it.
    pub async fn update_group<T, F>(
        &self,
        group_id: &GroupId,
        metadata: &CommandMetadata,
        mut mutate: F,
    ) -> Result<Committed<T>, RideError>
    where
        F: FnMut(&mut Group) -> Result<Staged<T>, RideError> + Send,
        T: Send,
    {
        let mut attempt = 1;
        loop {
            let snapshot = self
                .store
                .load_group(group_id)
                .await?
                .ok_or(RideError::GroupNotFound(*group_id))?;
            let mut group = snapshot.value;
            let staged = mutate(&mut group)?;

            match self.store.save_group(&group, snapshot.version).await {
                Ok(version) => {
                    info!(group_id = %group_id, status = %group.status(), %version, "group updated");
                    return Ok(self.commit(staged, version, metadata).await);
                }
                Err(err) => attempt = self.next_attempt(group_id, attempt, err)?,
            }
        }
    }

    /// Apply `create` to a group and commit the ride it produces together
    /// with the group.
    pub async fn create_ride<T, F>(
        &self,
        group_id: &GroupId,
        metadata: &CommandMetadata,
        mut create: F,
    ) -> Result<Committed<T>, RideError>
    where
        F: FnMut(&mut Group) -> Result<(Ride, Staged<T>), RideError> + Send,
        T: Send,
    {
        let mut attempt = 1;
        loop {
            let snapshot = self
                .store
                .load_group(group_id)
                .await?
                .ok_or(RideError::GroupNotFound(*group_id))?;
            let mut group = snapshot.value;
            let (ride, staged) = create(&mut group)?;

            match self
                .store
                .save_group_and_ride(&group, &ride, snapshot.version)
                .await
            {
                Ok(version) => {
                    info!(group_id = %group_id, ride_id = %ride.id(), %version, "ride created");
                    return Ok(self.commit(staged, version, metadata).await);
                }
                Err(err) => attempt = self.next_attempt(group_id, attempt, err)?,
            }
        }
    }

    /// Apply `mutate` to a ride and save it.
    pub async fn update_ride<T, F>(
        &self,
        ride_id: &RideId,
        metadata: &CommandMetadata,
        mut mutate: F,
    ) -> Result<Committed<T>, RideError>
    where
        F: FnMut(&mut Ride) -> Result<Staged<T>, RideError> + Send,
        T: Send,
    {
        let mut attempt = 1;
        loop {
            let snapshot = self
                .store
                .load_ride(ride_id)
                .await?
                .ok_or(RideError::RideNotFound(*ride_id))?;
            let mut ride = snapshot.value;
            let group_id = *ride.group_id();
            let staged = mutate(&mut ride)?;

            match self.store.save_ride(&ride, snapshot.version).await {
                Ok(version) => {
                    debug!(ride_id = %ride_id, %version, "ride updated");
                    return Ok(self.commit(staged, version, metadata).await);
                }
                Err(err) => attempt = self.next_attempt(&group_id, attempt, err)?,
            }
        }
    }

    /// Apply `mutate` to a ride and its group and commit both together.
    pub async fn update_group_and_ride<T, F>(
        &self,
        ride_id: &RideId,
        metadata: &CommandMetadata,
        mut mutate: F,
    ) -> Result<Committed<T>, RideError>
    where
        F: FnMut(&mut Group, &mut Ride) -> Result<Staged<T>, RideError> + Send,
        T: Send,
    {
        let mut attempt = 1;
        loop {
            let ride_snapshot = self
                .store
                .load_ride(ride_id)
                .await?
                .ok_or(RideError::RideNotFound(*ride_id))?;
            let mut ride = ride_snapshot.value;
            let group_id = *ride.group_id();
            let mut group = self
                .store
                .load_group(&group_id)
                .await?
                .ok_or(RideError::GroupNotFound(group_id))?
                .value;
            let staged = mutate(&mut group, &mut ride)?;

            // The ride's version is the domain version; a newer group
            // snapshot makes this save fail and retry.
            match self
                .store
                .save_group_and_ride(&group, &ride, ride_snapshot.version)
                .await
            {
                Ok(version) => {
                    info!(
                        group_id = %group_id,
                        ride_id = %ride_id,
                        ride_status = %ride.status(),
                        group_status = %group.status(),
                        %version,
                        "ride and group updated"
                    );
                    return Ok(self.commit(staged, version, metadata).await);
                }
                Err(err) => attempt = self.next_attempt(&group_id, attempt, err)?,
            }
        }
    }

    fn next_attempt(&self, group_id: &GroupId, attempt: u32, err: StoreError) -> Result<u32, RideError> {
        if !err.is_conflict() {
            return Err(err.into());
        }
        if attempt >= self.max_attempts {
            warn!(group_id = %group_id, attempts = attempt, "version conflicts exhausted write attempts");
            return Err(RideError::ConcurrentModification {
                group_id: *group_id,
                attempts: attempt,
            });
        }
        debug!(group_id = %group_id, attempt, error = %err, "version conflict, retrying");
        Ok(attempt + 1)
    }

    async fn commit<T>(&self, staged: Staged<T>, version: Version, metadata: &CommandMetadata) -> Committed<T> {
        self.publish(staged.events, metadata).await;
        Committed {
            output: staged.output,
            version,
        }
    }

    async fn publish(&self, events: Vec<EventEnvelope>, metadata: &CommandMetadata) {
        if events.is_empty() {
            return;
        }

        // One correlation id for every event of the command.
        let correlation_id = metadata.correlation_id();
        let metadata = metadata.clone().with_correlation_id(correlation_id.as_str());
        let events: Vec<EventEnvelope> = events.into_iter().map(|e| metadata.stamp(e)).collect();
        let count = events.len();

        if let Err(err) = self.event_publisher.publish_all(events).await {
            warn!(
                correlation_id = %correlation_id,
                events = count,
                error = %err,
                "event publication failed after commit"
            );
        }
    }
}
