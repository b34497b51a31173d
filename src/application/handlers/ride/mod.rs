//! Ride command handlers.

mod close_ride;
mod create_ride;
mod mark_paid;
mod request_seat;
mod review_payment;
mod update_rider_status;
mod upload_qr_code;

pub use close_ride::{CloseRideCommand, CloseRideHandler, CloseRideResult};
pub use create_ride::{CreateRideCommand, CreateRideHandler, CreateRideResult};
pub use mark_paid::{MarkPaidCommand, MarkPaidHandler, MarkPaidResult};
pub use request_seat::{RequestSeatCommand, RequestSeatHandler, RequestSeatResult};
pub use review_payment::{
    PaymentReview, ReviewPaymentCommand, ReviewPaymentHandler, ReviewPaymentResult,
};
pub use update_rider_status::{
    UpdateRiderStatusCommand, UpdateRiderStatusHandler, UpdateRiderStatusResult,
};
pub use upload_qr_code::{UploadQrCodeCommand, UploadQrCodeHandler, UploadQrCodeResult};
