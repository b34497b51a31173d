//! Ride domain module.
//!
//! A ride belongs to exactly one locked group and owns the per-rider seat
//! state: request decision first, then the payment cycle.

mod aggregate;
mod events;
mod qr_code;
mod seat;

pub use aggregate::Ride;
pub use events::{
    PaymentMarked, PaymentQrCodeAttached, PaymentRejected, PaymentVerified, RideClosed,
    RideCreated, RiderAccepted, RiderDeclined, SeatRequested,
};
pub use qr_code::PaymentQrCode;
pub use seat::RiderSeat;
