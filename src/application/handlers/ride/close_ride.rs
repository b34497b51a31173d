//! CloseRideHandler - Driver closes a settled ride.
//!
//! Closing completes the owning group in the same commit.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{CommandMetadata, EventId, RideError, RideId, UserId, Version};
use crate::domain::group::{Group, GroupCompleted};
use crate::domain::lifecycle::{standing, Operation, SeatStanding};
use crate::domain::ride::{Ride, RideClosed};

#[derive(Debug, Clone)]
pub struct CloseRideCommand {
    pub ride_id: RideId,
    pub driver_id: UserId,
}

#[derive(Debug, Clone)]
pub struct CloseRideResult {
    pub ride: Ride,
    pub group: Group,
    pub version: Version,
}

/// Handler for closing rides.
pub struct CloseRideHandler {
    write_path: WritePath,
}

impl CloseRideHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: CloseRideCommand,
        metadata: CommandMetadata,
    ) -> Result<CloseRideResult, RideError> {
        metadata.ensure_acting_user(&cmd.driver_id, Operation::CloseRide.as_str())?;
        let committed = self
            .write_path
            .update_group_and_ride(&cmd.ride_id, &metadata, |group, ride| {
                ride.close(&cmd.driver_id)?;
                group.complete(*ride.id())?;

                let closed_at = ride.closed_at().copied().unwrap_or_else(|| *group.updated_at());
                let closed = RideClosed {
                    event_id: EventId::new(),
                    ride_id: *ride.id(),
                    group_id: *group.id(),
                    driver_id: cmd.driver_id.clone(),
                    settled_riders: ride
                        .seats()
                        .filter(|s| standing(s.request_state(), s.payment_state()) == SeatStanding::Settled)
                        .map(|s| s.rider_id().clone())
                        .collect(),
                    closed_at,
                };
                let completed = GroupCompleted {
                    event_id: EventId::new(),
                    group_id: *group.id(),
                    ride_id: *ride.id(),
                    completed_at: *group.updated_at(),
                };

                Ok(Staged::new((ride.clone(), group.clone()))
                    .with_event(&closed)
                    .with_event(&completed))
            })
            .await?;

        let (ride, group) = committed.output;
        Ok(CloseRideResult {
            ride,
            group,
            version: committed.version,
        })
    }
}
