//! MarkPaidHandler - Rider reports having paid for their seat.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{
    CommandMetadata, EventId, RideError, RideId, Timestamp, UserId, Version,
};
use crate::domain::lifecycle::Operation;
use crate::domain::ride::{PaymentMarked, RiderSeat};

/// Command to mark a seat paid. Only the seat's rider may send it.
#[derive(Debug, Clone)]
pub struct MarkPaidCommand {
    pub ride_id: RideId,
    pub rider_id: UserId,
}

#[derive(Debug, Clone)]
pub struct MarkPaidResult {
    pub seat: RiderSeat,
    pub version: Version,
}

/// Handler for payment marks.
pub struct MarkPaidHandler {
    write_path: WritePath,
}

impl MarkPaidHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: MarkPaidCommand,
        metadata: CommandMetadata,
    ) -> Result<MarkPaidResult, RideError> {
        metadata.ensure_acting_user(&cmd.rider_id, Operation::MarkPaid.as_str())?;
        let committed = self
            .write_path
            .update_ride(&cmd.ride_id, &metadata, |ride| {
                ride.mark_paid(&metadata.user_id, &cmd.rider_id)?;
                let seat = ride
                    .seat(&cmd.rider_id)
                    .cloned()
                    .ok_or_else(|| RideError::SeatNotFound {
                        ride_id: cmd.ride_id,
                        rider_id: cmd.rider_id.clone(),
                    })?;
                let event = PaymentMarked {
                    event_id: EventId::new(),
                    ride_id: cmd.ride_id,
                    rider_id: cmd.rider_id.clone(),
                    marked_at: Timestamp::now(),
                };
                Ok(Staged::new(seat).with_event(&event))
            })
            .await?;

        Ok(MarkPaidResult {
            seat: committed.output,
            version: committed.version,
        })
    }
}
