//! Ride domain events.
//!
//! Events published as a ride and its seats progress:
//! - `RideCreated` - Ride created from a locked group
//! - `SeatRequested` - Rider asked for a seat
//! - `RiderAccepted` / `RiderDeclined` - Driver decision on a seat
//! - `PaymentMarked` - Rider reports having paid
//! - `PaymentVerified` / `PaymentRejected` - Driver review of a payment
//! - `RideClosed` - Ride settled and closed
//! - `PaymentQrCodeAttached` - Payment instructions uploaded

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, GroupId, RideId, Timestamp, UserId};

// ════════════════════════════════════════════════════════════════════════════
// RideCreated
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideCreated {
    pub event_id: EventId,
    pub ride_id: RideId,
    pub group_id: GroupId,
    pub driver_id: UserId,
    /// Group members seeded with a requested seat.
    pub seeded_riders: Vec<UserId>,
    pub seat_capacity: u32,
    pub created_at: Timestamp,
}

domain_event!(
    RideCreated,
    event_type = "ride.created.v1",
    schema_version = 1,
    aggregate_id = ride_id,
    aggregate_type = "Ride",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SeatRequested
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatRequested {
    pub event_id: EventId,
    pub ride_id: RideId,
    pub rider_id: UserId,
    pub requested_at: Timestamp,
}

domain_event!(
    SeatRequested,
    event_type = "ride.seat_requested.v1",
    schema_version = 1,
    aggregate_id = ride_id,
    aggregate_type = "Ride",
    occurred_at = requested_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Driver decisions
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderAccepted {
    pub event_id: EventId,
    pub ride_id: RideId,
    pub rider_id: UserId,
    pub driver_id: UserId,
    pub decided_at: Timestamp,
}

domain_event!(
    RiderAccepted,
    event_type = "ride.rider_accepted.v1",
    schema_version = 1,
    aggregate_id = ride_id,
    aggregate_type = "Ride",
    occurred_at = decided_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderDeclined {
    pub event_id: EventId,
    pub ride_id: RideId,
    pub rider_id: UserId,
    pub driver_id: UserId,
    pub decided_at: Timestamp,
}

domain_event!(
    RiderDeclined,
    event_type = "ride.rider_declined.v1",
    schema_version = 1,
    aggregate_id = ride_id,
    aggregate_type = "Ride",
    occurred_at = decided_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Payment
// ════════════════════════════════════════════════════════════════════════════

/// Self-reported by the rider; not authoritative until verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMarked {
    pub event_id: EventId,
    pub ride_id: RideId,
    pub rider_id: UserId,
    pub marked_at: Timestamp,
}

domain_event!(
    PaymentMarked,
    event_type = "ride.payment_marked.v1",
    schema_version = 1,
    aggregate_id = ride_id,
    aggregate_type = "Ride",
    occurred_at = marked_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerified {
    pub event_id: EventId,
    pub ride_id: RideId,
    pub rider_id: UserId,
    pub verified_by: UserId,
    pub verified_at: Timestamp,
}

domain_event!(
    PaymentVerified,
    event_type = "ride.payment_verified.v1",
    schema_version = 1,
    aggregate_id = ride_id,
    aggregate_type = "Ride",
    occurred_at = verified_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRejected {
    pub event_id: EventId,
    pub ride_id: RideId,
    pub rider_id: UserId,
    pub rejected_by: UserId,
    pub rejected_at: Timestamp,
}

domain_event!(
    PaymentRejected,
    event_type = "ride.payment_rejected.v1",
    schema_version = 1,
    aggregate_id = ride_id,
    aggregate_type = "Ride",
    occurred_at = rejected_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentQrCodeAttached {
    pub event_id: EventId,
    pub ride_id: RideId,
    pub reference: String,
    pub content_type: String,
    pub attached_at: Timestamp,
}

domain_event!(
    PaymentQrCodeAttached,
    event_type = "ride.payment_qr_code_attached.v1",
    schema_version = 1,
    aggregate_id = ride_id,
    aggregate_type = "Ride",
    occurred_at = attached_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// RideClosed
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideClosed {
    pub event_id: EventId,
    pub ride_id: RideId,
    pub group_id: GroupId,
    pub driver_id: UserId,
    /// Riders whose verified payment settled the ride.
    pub settled_riders: Vec<UserId>,
    pub closed_at: Timestamp,
}

domain_event!(
    RideClosed,
    event_type = "ride.closed.v1",
    schema_version = 1,
    aggregate_id = ride_id,
    aggregate_type = "Ride",
    occurred_at = closed_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SerializableDomainEvent;

    #[test]
    fn payment_verified_envelope_carries_rider() {
        let ride_id = RideId::new();
        let event = PaymentVerified {
            event_id: EventId::new(),
            ride_id,
            rider_id: UserId::new("ana").unwrap(),
            verified_by: UserId::new("drv").unwrap(),
            verified_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();

        assert_eq!(envelope.event_type, "ride.payment_verified.v1");
        assert_eq!(envelope.aggregate_id, ride_id.to_string());
        assert_eq!(envelope.payload["rider_id"], "ana");
    }
}
