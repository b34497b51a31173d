//! UploadQrCodeHandler - Driver attaches payment QR instructions to a ride.
//!
//! The image is stored by the upload collaborator; this handler records the
//! reference it returned.

use crate::application::{Staged, WritePath};
use crate::domain::foundation::{CommandMetadata, EventId, RideError, RideId, UserId, Version};
use crate::domain::lifecycle::Operation;
use crate::domain::ride::{PaymentQrCode, PaymentQrCodeAttached};

#[derive(Debug, Clone)]
pub struct UploadQrCodeCommand {
    pub ride_id: RideId,
    pub driver_id: UserId,
    pub reference: String,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct UploadQrCodeResult {
    pub qr_code: PaymentQrCode,
    pub version: Version,
}

/// Handler for payment QR uploads.
pub struct UploadQrCodeHandler {
    write_path: WritePath,
}

impl UploadQrCodeHandler {
    pub fn new(write_path: WritePath) -> Self {
        Self { write_path }
    }

    pub async fn handle(
        &self,
        cmd: UploadQrCodeCommand,
        metadata: CommandMetadata,
    ) -> Result<UploadQrCodeResult, RideError> {
        metadata.ensure_acting_user(&cmd.driver_id, Operation::AttachQrCode.as_str())?;
        let qr_code = PaymentQrCode::new(cmd.reference, cmd.content_type)?;

        let committed = self
            .write_path
            .update_ride(&cmd.ride_id, &metadata, |ride| {
                ride.attach_qr_code(&cmd.driver_id, qr_code.clone())?;
                let event = PaymentQrCodeAttached {
                    event_id: EventId::new(),
                    ride_id: cmd.ride_id,
                    reference: qr_code.reference().to_string(),
                    content_type: qr_code.content_type().to_string(),
                    attached_at: *qr_code.attached_at(),
                };
                Ok(Staged::new(()).with_event(&event))
            })
            .await?;

        Ok(UploadQrCodeResult {
            qr_code,
            version: committed.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{metadata, user, Harness};
    use crate::domain::foundation::ValidationError;

    fn upload(ride_id: RideId, driver: &str, reference: &str) -> UploadQrCodeCommand {
        UploadQrCodeCommand {
            ride_id,
            driver_id: user(driver),
            reference: reference.to_string(),
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn driver_attaches_and_replaces_qr_code() {
        let harness = Harness::new();
        let ride_id = harness.active_ride("ana", &["ben"], "ana").await;
        let handler = UploadQrCodeHandler::new(harness.write_path.clone());

        handler
            .handle(upload(ride_id, "ana", "uploads/qr-1.png"), metadata("ana"))
            .await
            .unwrap();
        handler
            .handle(upload(ride_id, "ana", "uploads/qr-2.png"), metadata("ana"))
            .await
            .unwrap();

        let ride = harness.ride(&ride_id).await;
        assert_eq!(ride.qr_code().unwrap().reference(), "uploads/qr-2.png");
        assert_eq!(
            harness.bus.events_of_type("ride.payment_qr_code_attached.v1").len(),
            2
        );
    }

    #[tokio::test]
    async fn rider_cannot_upload() {
        let harness = Harness::new();
        let ride_id = harness.active_ride("ana", &["ben"], "ana").await;
        let handler = UploadQrCodeHandler::new(harness.write_path.clone());

        let err = handler
            .handle(upload(ride_id, "ben", "uploads/qr.png"), metadata("ben"))
            .await
            .unwrap_err();

        assert!(matches!(err, RideError::Unauthorized { .. }));
        assert!(harness.ride(&ride_id).await.qr_code().is_none());
    }

    #[tokio::test]
    async fn blank_reference_is_rejected_before_loading() {
        let harness = Harness::new();
        let handler = UploadQrCodeHandler::new(harness.write_path.clone());

        let err = handler
            .handle(upload(RideId::new(), "ana", "  "), metadata("ana"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RideError::Validation(ValidationError::empty_field("reference"))
        );
    }
}
