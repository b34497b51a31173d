//! Command infrastructure for handlers.
//!
//! `CommandMetadata` carries the pre-authenticated acting user plus request
//! correlation context through every command handler and onto the events
//! the handler emits.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EventEnvelope, RideError, UserId};

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this command. Trusted as authenticated upstream.
    pub user_id: UserId,

    /// Links related operations across a single user request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Distributed tracing span/trace ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata with required user ID.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: None,
            trace_id: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add trace ID for distributed tracing.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the trace ID if set.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Commands name their actor explicitly; it must be the caller.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when `actor` is not `user_id`
    pub fn ensure_acting_user(
        &self,
        actor: &UserId,
        operation: &'static str,
    ) -> Result<(), RideError> {
        if &self.user_id == actor {
            Ok(())
        } else {
            Err(RideError::unauthorized(&self.user_id, operation))
        }
    }

    /// Stamps an outgoing event envelope with this command's context.
    pub fn stamp(&self, envelope: EventEnvelope) -> EventEnvelope {
        let envelope = envelope
            .with_correlation_id(self.correlation_id())
            .with_user_id(self.user_id.to_string());
        match &self.trace_id {
            Some(trace_id) => envelope.with_trace_id(trace_id.clone()),
            None => envelope,
        }
    }
}
