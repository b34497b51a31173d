//! EventPublisher port - Interface for publishing domain events.
//!
//! Lifecycle transitions are announced to notification collaborators
//! (chat, email) through this port once they are committed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations deliver at-least-once; subscribers may see duplicates.
/// `publish_all` attempts every event even if delivering an earlier one fails.
/// The write path never waits on subscriber side effects beyond the call.
///
/// # Example
///
/// ```ignore
/// let envelope = locked_event.to_envelope();
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish the events of one committed operation, in order.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::adapters::InMemoryEventBus;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn publisher_is_usable_as_a_shared_trait_object() {
        let bus = Arc::new(InMemoryEventBus::new());
        let publisher: Arc<dyn EventPublisher> = bus.clone();

        publisher
            .publish_all(vec![
                EventEnvelope::new("ride.closed.v1", "r-1", "Ride", json!({})),
                EventEnvelope::new("group.completed.v1", "g-1", "Group", json!({})),
            ])
            .await
            .unwrap();

        assert_eq!(bus.event_types(), vec!["ride.closed.v1", "group.completed.v1"]);
    }
}
