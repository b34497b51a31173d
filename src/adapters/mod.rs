//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - In-memory event bus
//! - `storage` - In-memory group store
//! - `postgres` - PostgreSQL group store

pub mod events;
pub mod postgres;
pub mod storage;

pub use events::InMemoryEventBus;
pub use postgres::PostgresGroupStore;
pub use storage::InMemoryGroupStore;
