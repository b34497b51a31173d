//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `GroupStore` - Version-checked writes of a group and its ride
//! - `GroupReader` - Committed snapshots for queries
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events

mod event_publisher;
mod event_subscriber;
mod group_reader;
mod group_store;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventHandler, EventSubscriber};
pub use group_reader::GroupReader;
pub use group_store::{GroupStore, StoreError};
