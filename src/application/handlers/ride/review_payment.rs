//! ReviewPaymentHandler - Driver verifies or rejects a marked payment.

use serde::{Deserialize, Serialize};

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{
    CommandMetadata, EventId, RideError, RideId, Timestamp, UserId, Version,
};
use crate::domain::lifecycle::Operation;
use crate::domain::ride::{PaymentRejected, PaymentVerified, RiderSeat};

/// Driver's verdict on a payment the rider marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentReview {
    Verify,
    Reject,
}

#[derive(Debug, Clone)]
pub struct ReviewPaymentCommand {
    pub ride_id: RideId,
    pub rider_id: UserId,
    pub driver_id: UserId,
    pub review: PaymentReview,
}

impl ReviewPaymentCommand {
    pub fn verify(ride_id: RideId, rider_id: UserId, driver_id: UserId) -> Self {
        Self {
            ride_id,
            rider_id,
            driver_id,
            review: PaymentReview::Verify,
        }
    }

    pub fn reject(ride_id: RideId, rider_id: UserId, driver_id: UserId) -> Self {
        Self {
            ride_id,
            rider_id,
            driver_id,
            review: PaymentReview::Reject,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewPaymentResult {
    pub seat: RiderSeat,
    pub version: Version,
}

/// Handler for payment verification and rejection.
pub struct ReviewPaymentHandler {
    write_path: WritePath,
}

impl ReviewPaymentHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: ReviewPaymentCommand,
        metadata: CommandMetadata,
    ) -> Result<ReviewPaymentResult, RideError> {
        metadata.ensure_acting_user(&cmd.driver_id, Operation::ReviewPayment.as_str())?;
        let committed = self
            .write_path
            .update_ride(&cmd.ride_id, &metadata, |ride| {
                match cmd.review {
                    PaymentReview::Verify => ride.verify_payment(&cmd.driver_id, &cmd.rider_id)?,
                    PaymentReview::Reject => ride.reject_payment(&cmd.driver_id, &cmd.rider_id)?,
                }
                let seat = ride
                    .seat(&cmd.rider_id)
                    .cloned()
                    .ok_or_else(|| RideError::SeatNotFound {
                        ride_id: cmd.ride_id,
                        rider_id: cmd.rider_id.clone(),
                    })?;

                let now = Timestamp::now();
                let staged = match cmd.review {
                    PaymentReview::Verify => Staged::new(seat).with_event(&PaymentVerified {
                        event_id: EventId::new(),
                        ride_id: cmd.ride_id,
                        rider_id: cmd.rider_id.clone(),
                        verified_by: cmd.driver_id.clone(),
                        verified_at: now,
                    }),
                    PaymentReview::Reject => Staged::new(seat).with_event(&PaymentRejected {
                        event_id: EventId::new(),
                        ride_id: cmd.ride_id,
                        rider_id: cmd.rider_id.clone(),
                        rejected_by: cmd.driver_id.clone(),
                        rejected_at: now,
                    }),
                };
                Ok(staged)
            })
            .await?;

        Ok(ReviewPaymentResult {
            seat: committed.output,
            version: committed.version,
        })
    }
}
