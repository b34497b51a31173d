//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, versions, error types and the domain
//! event infrastructure that form the vocabulary of the ride pool domain.

mod command;
mod errors;
mod events;
mod ids;
mod timestamp;
mod version;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, RideError, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{GroupId, RideId, UserId};
pub use timestamp::Timestamp;
pub use version::{Version, Versioned};
