//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

use super::{GroupId, RideId, UserId};

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
///
/// Stable identifiers the outer layer translates into user-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidCapacity,

    // Not found errors
    GroupNotFound,
    RideNotFound,
    SeatNotFound,

    // Membership errors
    GroupNotOpen,
    GroupFull,
    AlreadyMember,
    NotMember,
    CreatorCannotLeaveAlone,
    InsufficientMembers,

    // Ride errors
    GroupNotLocked,
    RideAlreadyExists,
    RideClosed,
    RideFull,
    DuplicateRequest,
    RideNotSettleable,

    // State errors
    InvalidStateTransition,
    ConcurrentModification,

    // Authorization errors
    Unauthorized,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidCapacity => "INVALID_CAPACITY",
            ErrorCode::GroupNotFound => "GROUP_NOT_FOUND",
            ErrorCode::RideNotFound => "RIDE_NOT_FOUND",
            ErrorCode::SeatNotFound => "SEAT_NOT_FOUND",
            ErrorCode::GroupNotOpen => "GROUP_NOT_OPEN",
            ErrorCode::GroupFull => "GROUP_FULL",
            ErrorCode::AlreadyMember => "ALREADY_MEMBER",
            ErrorCode::NotMember => "NOT_MEMBER",
            ErrorCode::CreatorCannotLeaveAlone => "CREATOR_CANNOT_LEAVE_ALONE",
            ErrorCode::InsufficientMembers => "INSUFFICIENT_MEMBERS",
            ErrorCode::GroupNotLocked => "GROUP_NOT_LOCKED",
            ErrorCode::RideAlreadyExists => "RIDE_ALREADY_EXISTS",
            ErrorCode::RideClosed => "RIDE_CLOSED",
            ErrorCode::RideFull => "RIDE_FULL",
            ErrorCode::DuplicateRequest => "DUPLICATE_REQUEST",
            ErrorCode::RideNotSettleable => "RIDE_NOT_SETTLEABLE",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Typed outcome of every group and ride operation.
///
/// Only `ConcurrentModification` is retried by the write path; every other
/// variant is terminal for the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RideError {
    #[error("Group capacity must be at least {min}, got {actual}")]
    InvalidCapacity { min: u32, actual: u32 },

    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("Ride not found: {0}")]
    RideNotFound(RideId),

    #[error("No seat for rider {rider_id} on ride {ride_id}")]
    SeatNotFound { ride_id: RideId, rider_id: UserId },

    #[error("Group {0} is not open")]
    GroupNotOpen(GroupId),

    #[error("Group {0} is full")]
    GroupFull(GroupId),

    #[error("User {user_id} is already a member of group {group_id}")]
    AlreadyMember { group_id: GroupId, user_id: UserId },

    #[error("User {user_id} is not a member of group {group_id}")]
    NotMember { group_id: GroupId, user_id: UserId },

    #[error("Creator cannot leave group {0} as its last member; disband it instead")]
    CreatorCannotLeaveAlone(GroupId),

    #[error("User {user_id} is not allowed to {operation}")]
    Unauthorized {
        user_id: UserId,
        operation: &'static str,
    },

    #[error("Group {group_id} needs at least 2 members to lock, has {members}")]
    InsufficientMembers { group_id: GroupId, members: usize },

    #[error("Group {0} is not locked")]
    GroupNotLocked(GroupId),

    #[error("Group {group_id} already has ride {ride_id}")]
    RideAlreadyExists { group_id: GroupId, ride_id: RideId },

    #[error("Ride {0} is closed")]
    RideClosed(RideId),

    #[error("Ride {ride_id} has no free seats (capacity {seat_capacity})")]
    RideFull { ride_id: RideId, seat_capacity: u32 },

    #[error("Rider {rider_id} already holds a seat request on ride {ride_id}")]
    DuplicateRequest { ride_id: RideId, rider_id: UserId },

    #[error("Invalid {entity} transition from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Ride {ride_id} cannot be closed; unsettled riders: {}", join_riders(.unsettled))]
    RideNotSettleable {
        ride_id: RideId,
        unsettled: Vec<UserId>,
    },

    #[error("Group {group_id} was modified concurrently ({attempts} attempts)")]
    ConcurrentModification { group_id: GroupId, attempts: u32 },

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

fn join_riders(riders: &[UserId]) -> String {
    riders
        .iter()
        .map(UserId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl RideError {
    /// Creates an invalid transition error for the given entity.
    pub fn invalid_transition(
        entity: &'static str,
        from: impl fmt::Debug,
        to: impl fmt::Debug,
    ) -> Self {
        RideError::InvalidTransition {
            entity,
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }

    /// Creates an unauthorized error for the acting user.
    pub fn unauthorized(user_id: &UserId, operation: &'static str) -> Self {
        RideError::Unauthorized {
            user_id: user_id.clone(),
            operation,
        }
    }

    /// Returns the stable error code for this outcome.
    pub fn code(&self) -> ErrorCode {
        match self {
            RideError::InvalidCapacity { .. } => ErrorCode::InvalidCapacity,
            RideError::GroupNotFound(_) => ErrorCode::GroupNotFound,
            RideError::RideNotFound(_) => ErrorCode::RideNotFound,
            RideError::SeatNotFound { .. } => ErrorCode::SeatNotFound,
            RideError::GroupNotOpen(_) => ErrorCode::GroupNotOpen,
            RideError::GroupFull(_) => ErrorCode::GroupFull,
            RideError::AlreadyMember { .. } => ErrorCode::AlreadyMember,
            RideError::NotMember { .. } => ErrorCode::NotMember,
            RideError::CreatorCannotLeaveAlone(_) => ErrorCode::CreatorCannotLeaveAlone,
            RideError::Unauthorized { .. } => ErrorCode::Unauthorized,
            RideError::InsufficientMembers { .. } => ErrorCode::InsufficientMembers,
            RideError::GroupNotLocked(_) => ErrorCode::GroupNotLocked,
            RideError::RideAlreadyExists { .. } => ErrorCode::RideAlreadyExists,
            RideError::RideClosed(_) => ErrorCode::RideClosed,
            RideError::RideFull { .. } => ErrorCode::RideFull,
            RideError::DuplicateRequest { .. } => ErrorCode::DuplicateRequest,
            RideError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            RideError::RideNotSettleable { .. } => ErrorCode::RideNotSettleable,
            RideError::ConcurrentModification { .. } => ErrorCode::ConcurrentModification,
            RideError::Validation(_) => ErrorCode::ValidationFailed,
            RideError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns true if the write path may retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RideError::ConcurrentModification { .. })
    }
}

impl From<DomainError> for RideError {
    fn from(err: DomainError) -> Self {
        RideError::Infrastructure(err.to_string())
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Used by infrastructure ports (event publishing) where the failure is not
/// one of the lifecycle outcomes.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("user_id");
        assert_eq!(format!("{}", err), "Field 'user_id' cannot be empty");
    }

    #[test]
    fn not_settleable_lists_offending_riders() {
        let err = RideError::RideNotSettleable {
            ride_id: RideId::new(),
            unsettled: vec![user("ana"), user("ben")],
        };
        assert!(err.to_string().ends_with("unsettled riders: ana, ben"));
        assert_eq!(err.code(), ErrorCode::RideNotSettleable);
    }

    #[test]
    fn invalid_transition_formats_states() {
        let err = RideError::invalid_transition("seat", "Requested", "Verified");
        assert_eq!(
            err.to_string(),
            r#"Invalid seat transition from "Requested" to "Verified""#
        );
    }

    #[test]
    fn only_concurrent_modification_is_retryable() {
        let group_id = GroupId::new();
        assert!(RideError::ConcurrentModification { group_id, attempts: 1 }.is_retryable());
        assert!(!RideError::GroupFull(group_id).is_retryable());
        assert!(!RideError::Infrastructure("db down".into()).is_retryable());
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::InternalError, "Handler failed");
        assert_eq!(format!("{}", err), "[INTERNAL_ERROR] Handler failed");
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::GroupNotLocked), "GROUP_NOT_LOCKED");
        assert_eq!(
            format!("{}", ErrorCode::ConcurrentModification),
            "CONCURRENT_MODIFICATION"
        );
    }
}
