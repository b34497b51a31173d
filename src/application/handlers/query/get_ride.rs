//! Ride query handlers: the ride itself and its payment details.
//!
//! Both are restricted to the driver and riders holding a seat.

use std::sync::Arc;

use crate::domain::foundation::{RideError, RideId, UserId, Versioned};
use crate::domain::projection::{payment_details, ride_view, PaymentDetailsView, RideView};
use crate::domain::ride::Ride;
use crate::ports::GroupReader;

#[derive(Debug, Clone)]
pub struct GetRideQuery {
    pub ride_id: RideId,
    pub user_id: UserId,
}

async fn load(reader: &dyn GroupReader, ride_id: RideId) -> Result<Versioned<Ride>, RideError> {
    reader
        .get_ride(&ride_id)
        .await?
        .ok_or(RideError::RideNotFound(ride_id))
}

pub struct GetRideHandler {
    reader: Arc<dyn GroupReader>,
}

impl GetRideHandler {
    pub fn new(reader: Arc<dyn GroupReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetRideQuery) -> Result<RideView, RideError> {
        let ride = load(self.reader.as_ref(), query.ride_id).await?;
        ride_view(&query.user_id, &ride)
    }
}

/// Seat statuses, the QR reference and who still blocks closing.
pub struct GetPaymentDetailsHandler {
    reader: Arc<dyn GroupReader>,
}

impl GetPaymentDetailsHandler {
    pub fn new(reader: Arc<dyn GroupReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetRideQuery) -> Result<PaymentDetailsView, RideError> {
        let ride = load(self.reader.as_ref(), query.ride_id).await?;
        payment_details(&query.user_id, &ride.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Harness};
    use crate::domain::lifecycle::RiderDecision;
    use crate::domain::ride::PaymentQrCode;

    fn query(ride_id: RideId, who: &str) -> GetRideQuery {
        GetRideQuery {
            ride_id,
            user_id: user(who),
        }
    }

    #[tokio::test]
    async fn seat_holder_may_view_ride() {
        let harness = Harness::new();
        let ride_id = harness.active_ride("ana", &["ben"], "ana").await;
        let handler = GetRideHandler::new(harness.store.clone());

        let view = handler.handle(query(ride_id, "ben")).await.unwrap();

        assert_eq!(view.driver_id, user("ana"));
        assert_eq!(view.seats.len(), 1);
        assert!(!view.has_qr_code);
    }

    #[tokio::test]
    async fn outsider_may_not_view_ride() {
        let harness = Harness::new();
        let ride_id = harness.active_ride("ana", &["ben"], "ana").await;
        let handler = GetRideHandler::new(harness.store.clone());

        let err = handler.handle(query(ride_id, "zed")).await.unwrap_err();

        assert!(matches!(err, RideError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn payment_details_list_unsettled_riders_and_qr_code() {
        let harness = Harness::new();
        let ride_id = harness.active_ride("ana", &["ben", "cy"], "ana").await;
        harness
            .edit_ride(&ride_id, |ride| {
                let driver = user("ana");
                ride.decide_rider(&driver, &user("ben"), RiderDecision::Reject).unwrap();
                ride.attach_qr_code(&driver, PaymentQrCode::new("uploads/qr.png", "image/png").unwrap())
                    .unwrap();
            })
            .await;
        let handler = GetPaymentDetailsHandler::new(harness.store.clone());

        let details = handler.handle(query(ride_id, "ana")).await.unwrap();

        assert_eq!(details.unsettled_riders, vec![user("cy")]);
        assert!(!details.settleable);
        assert_eq!(details.qr_code.unwrap().reference, "uploads/qr.png");
    }

    #[tokio::test]
    async fn missing_ride_is_not_found() {
        let harness = Harness::new();
        let handler = GetPaymentDetailsHandler::new(harness.store.clone());
        let missing = RideId::new();

        let err = handler.handle(query(missing, "ana")).await.unwrap_err();

        assert_eq!(err, RideError::RideNotFound(missing));
    }
}
