//! Payment QR code reference.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Opaque reference to an uploaded payment QR image.
///
/// The image itself lives with the upload collaborator; the ride only keeps
/// where to find it and what it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentQrCode {
    reference: String,
    content_type: String,
    attached_at: Timestamp,
}

impl PaymentQrCode {
    /// # Errors
    ///
    /// - `EmptyField` if the reference is blank
    /// - `InvalidFormat` if the content type is not an image type
    pub fn new(
        reference: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let reference = reference.into();
        let content_type = content_type.into();

        if reference.trim().is_empty() {
            return Err(ValidationError::empty_field("reference"));
        }
        if !content_type.starts_with("image/") {
            return Err(ValidationError::invalid_format(
                "content_type",
                format!("expected an image type, got '{}'", content_type),
            ));
        }

        Ok(Self {
            reference,
            content_type,
            attached_at: Timestamp::now(),
        })
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn attached_at(&self) -> &Timestamp {
        &self.attached_at
    }
}
