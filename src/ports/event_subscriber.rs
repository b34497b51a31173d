//! EventSubscriber port - Notification collaborators register here.
//!
//! Chat and email notifiers react to committed lifecycle events such as
//! `group.locked.v1` or `ride.closed.v1`. They only ever see an event after
//! the group or ride change it describes has been saved.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Reacts to one lifecycle event.
///
/// Delivery is at-least-once, so a handler must tolerate seeing the same
/// `event_id` twice. A failing handler does not stop delivery of other
/// events from the same command.
///
/// # Example
///
/// ```ignore
/// struct RideChatNotifier { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for RideChatNotifier {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let closed: RideClosed = event.payload_as()?;
///         // Post to the group's chat...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "RideChatNotifier"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Name reported when the handler fails.
    fn name(&self) -> &'static str;
}

/// Registration of handlers by event type.
///
/// ```ignore
/// subscriber.subscribe("group.locked.v1", driver_prompt);
/// subscriber.subscribe_all(&["ride.payment_verified.v1", "ride.closed.v1"], chat_notifier);
/// ```
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Registers one handler instance for several event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryEventBus;
    use crate::ports::EventPublisher;
    use serde_json::json;
    use std::sync::Mutex;

    fn assert_send_sync<T: Send + Sync + ?Sized>() {}

    /// Records the event types it receives.
    struct Recorder(Mutex<Vec<String>>);

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
            self.0.lock().unwrap().push(event.event_type);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "Recorder"
        }
    }

    #[test]
    fn ports_are_shareable_across_tasks() {
        assert_send_sync::<dyn EventHandler>();
        assert_send_sync::<dyn EventSubscriber>();
        assert_send_sync::<InMemoryEventBus>();
    }

    #[tokio::test]
    async fn subscribe_all_through_the_port_routes_each_listed_type() {
        let bus = Arc::new(InMemoryEventBus::new());
        let subscriber: Arc<dyn EventSubscriber> = bus.clone();
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));

        subscriber.subscribe_all(&["ride.closed.v1", "group.completed.v1"], recorder.clone());

        for event_type in ["ride.closed.v1", "ride.created.v1", "group.completed.v1"] {
            bus.publish(EventEnvelope::new(event_type, "agg-1", "Ride", json!({})))
                .await
                .unwrap();
        }

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["ride.closed.v1", "group.completed.v1"]
        );
    }
}
