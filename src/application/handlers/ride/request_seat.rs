//! RequestSeatHandler - Command handler for asking for a seat on a ride.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{CommandMetadata, EventId, RideError, RideId, UserId, Version};
use crate::domain::lifecycle::Operation;
use crate::domain::ride::{RiderSeat, SeatRequested};

/// Command to request a seat. Any user but the driver may ask.
#[derive(Debug, Clone)]
pub struct RequestSeatCommand {
    pub ride_id: RideId,
    pub rider_id: UserId,
}

#[derive(Debug, Clone)]
pub struct RequestSeatResult {
    pub seat: RiderSeat,
    pub version: Version,
}

/// Handler for seat requests.
pub struct RequestSeatHandler {
    write_path: WritePath,
}

impl RequestSeatHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: RequestSeatCommand,
        metadata: CommandMetadata,
    ) -> Result<RequestSeatResult, RideError> {
        metadata.ensure_acting_user(&cmd.rider_id, Operation::RequestSeat.as_str())?;
        let committed = self
            .write_path
            .update_ride(&cmd.ride_id, &metadata, |ride| {
                ride.request_seat(cmd.rider_id.clone())?;
                let seat = ride
                    .seat(&cmd.rider_id)
                    .cloned()
                    .ok_or_else(|| RideError::SeatNotFound {
                        ride_id: cmd.ride_id,
                        rider_id: cmd.rider_id.clone(),
                    })?;

                let event = SeatRequested {
                    event_id: EventId::new(),
                    ride_id: cmd.ride_id,
                    rider_id: cmd.rider_id.clone(),
                    requested_at: *seat.requested_at(),
                };
                Ok(Staged::new(seat).with_event(&event))
            })
            .await?;

        Ok(RequestSeatResult {
            seat: committed.output,
            version: committed.version,
        })
    }
}
