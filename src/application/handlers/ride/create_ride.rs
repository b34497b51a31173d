//! CreateRideHandler - Command handler for creating the ride of a locked group.
//!
//! The group records the ride id and the ride seeds a requested seat for
//! every member except the driver. Both are committed in one write.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{
    CommandMetadata, EventId, GroupId, RideError, RideId, UserId, Version,
};
use crate::domain::ride::{Ride, RideCreated};

/// Command to create a ride. The driver must be a group member.
#[derive(Debug, Clone)]
pub struct CreateRideCommand {
    pub group_id: GroupId,
    pub driver_id: UserId,
}

#[derive(Debug, Clone)]
pub struct CreateRideResult {
    pub ride: Ride,
    pub version: Version,
    pub event: RideCreated,
}

/// Handler for creating rides.
pub struct CreateRideHandler {
    write_path: WritePath,
}

impl CreateRideHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: CreateRideCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateRideResult, RideError> {
        metadata.ensure_acting_user(&cmd.driver_id, "create ride")?;
        let committed = self
            .write_path
            .create_ride(&cmd.group_id, &metadata, |group| {
                let ride_id = RideId::new();
                group.attach_ride(ride_id, &cmd.driver_id)?;
                let ride = Ride::for_group(ride_id, group, cmd.driver_id.clone());

                let event = RideCreated {
                    event_id: EventId::new(),
                    ride_id,
                    group_id: *group.id(),
                    driver_id: cmd.driver_id.clone(),
                    seeded_riders: ride.seats().map(|s| s.rider_id().clone()).collect(),
                    seat_capacity: ride.seat_capacity(),
                    created_at: *ride.created_at(),
                };
                let staged = Staged::new((ride.clone(), event.clone())).with_event(&event);
                Ok((ride, staged))
            })
            .await?;

        let (ride, event) = committed.output;
        Ok(CreateRideResult {
            ride,
            version: committed.version,
            event,
        })
    }
}
