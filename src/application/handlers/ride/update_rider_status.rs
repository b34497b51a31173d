//! UpdateRiderStatusHandler - Driver accepts or declines a seat request.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{
    CommandMetadata, EventId, RideError, RideId, Timestamp, UserId, Version,
};
use crate::domain::lifecycle::{Operation, RiderDecision};
use crate::domain::ride::{RiderAccepted, RiderDeclined, RiderSeat};

/// Command carrying the driver's decision on one rider.
#[derive(Debug, Clone)]
pub struct UpdateRiderStatusCommand {
    pub ride_id: RideId,
    pub rider_id: UserId,
    pub decision: RiderDecision,
    pub driver_id: UserId,
}

#[derive(Debug, Clone)]
pub struct UpdateRiderStatusResult {
    pub seat: RiderSeat,
    pub version: Version,
}

/// Handler for driver decisions.
pub struct UpdateRiderStatusHandler {
    write_path: WritePath,
}

impl UpdateRiderStatusHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: UpdateRiderStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateRiderStatusResult, RideError> {
        metadata.ensure_acting_user(&cmd.driver_id, Operation::DecideRider.as_str())?;
        let committed = self
            .write_path
            .update_ride(&cmd.ride_id, &metadata, |ride| {
                ride.decide_rider(&cmd.driver_id, &cmd.rider_id, cmd.decision)?;
                let seat = ride
                    .seat(&cmd.rider_id)
                    .cloned()
                    .ok_or_else(|| RideError::SeatNotFound {
                        ride_id: cmd.ride_id,
                        rider_id: cmd.rider_id.clone(),
                    })?;

                let decided_at = Timestamp::now();
                let staged = match cmd.decision {
                    RiderDecision::Accept => Staged::new(seat).with_event(&RiderAccepted {
                        event_id: EventId::new(),
                        ride_id: cmd.ride_id,
                        rider_id: cmd.rider_id.clone(),
                        driver_id: cmd.driver_id.clone(),
                        decided_at,
                    }),
                    RiderDecision::Reject => Staged::new(seat).with_event(&RiderDeclined {
                        event_id: EventId::new(),
                        ride_id: cmd.ride_id,
                        rider_id: cmd.rider_id.clone(),
                        driver_id: cmd.driver_id.clone(),
                        decided_at,
                    }),
                };
                Ok(staged)
            })
            .await?;

        Ok(UpdateRiderStatusResult {
            seat: committed.output,
            version: committed.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{metadata, user, Harness};
    use crate::domain::lifecycle::{PaymentState, RequestState};

    fn decide(ride_id: RideId, rider: &str, decision: RiderDecision, driver: &str) -> UpdateRiderStatusCommand {
        UpdateRiderStatusCommand {
            ride_id,
            rider_id: user(rider),
            decision,
            driver_id: user(driver),
        }
    }

    #[tokio::test]
    async fn accept_opens_payment() {
        let harness = Harness::new();
        let ride_id = harness.active_ride("ana", &["ben"], "ana").await;
        let handler = UpdateRiderStatusHandler::new(harness.write_path.clone());

        let result = handler
            .handle(decide(ride_id, "ben", RiderDecision::Accept, "ana"), metadata("ana"))
            .await
            .unwrap();

        assert_eq!(result.seat.request_state(), RequestState::Accepted);
        assert_eq!(result.seat.payment_state(), PaymentState::Pending);
        assert!(harness.bus.has_event("ride.rider_accepted.v1"));
    }

    #[tokio::test]
    async fn reject_declines_for_good() {
        let harness = Harness::new();
        let ride_id = harness.active_ride("ana", &["ben"], "ana").await;
        let handler = UpdateRiderStatusHandler::new(harness.write_path.clone());

        handler
            .handle(decide(ride_id, "ben", RiderDecision::Reject, "ana"), metadata("ana"))
            .await
            .unwrap();
        let err = handler
            .handle(decide(ride_id, "ben", RiderDecision::Accept, "ana"), metadata("ana"))
            .await
            .unwrap_err();

        assert!(matches!(err, RideError::InvalidTransition { .. }));
        let seat = harness.ride(&ride_id).await.seat(&user("ben")).cloned().unwrap();
        assert_eq!(seat.request_state(), RequestState::Declined);
        assert_eq!(harness.bus.event_types(), vec!["ride.rider_declined.v1"]);
    }

    #[tokio::test]
    async fn only_the_driver_decides() {
        let harness = Harness::new();
        let ride_id = harness.active_ride("ana", &["ben", "cy"], "ana").await;
        let handler = UpdateRiderStatusHandler::new(harness.write_path.clone());

        let err = handler
            .handle(decide(ride_id, "ben", RiderDecision::Accept, "cy"), metadata("cy"))
            .await
            .unwrap_err();

        assert!(matches!(err, RideError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn accepting_beyond_capacity_reports_ride_full() {
        let harness = Harness::new();
        // Capacity 2 leaves one seat next to the driver.
        let ride_id = harness.active_ride("ana", &["ben"], "ana").await;
        harness
            .edit_ride(&ride_id, |ride| ride.request_seat(user("dee")).unwrap())
            .await;
        let handler = UpdateRiderStatusHandler::new(harness.write_path.clone());
        handler
            .handle(decide(ride_id, "ben", RiderDecision::Accept, "ana"), metadata("ana"))
            .await
            .unwrap();

        let err = handler
            .handle(decide(ride_id, "dee", RiderDecision::Accept, "ana"), metadata("ana"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RideError::RideFull {
                ride_id,
                seat_capacity: 1
            }
        );
    }

    #[tokio::test]
    async fn missing_seat_is_reported() {
        let harness = Harness::new();
        let ride_id = harness.active_ride("ana", &["ben"], "ana").await;
        let handler = UpdateRiderStatusHandler::new(harness.write_path.clone());

        let err = handler
            .handle(decide(ride_id, "zed", RiderDecision::Accept, "ana"), metadata("ana"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RideError::SeatNotFound {
                ride_id,
                rider_id: user("zed")
            }
        );
    }
}
