//! Storage Adapters
//!
//! - **InMemoryGroupStore** - Group domains in memory (tests and embedding)
//!
//! ## Usage
//!
//! ```ignore
//! use ride_pool::adapters::{InMemoryEventBus, InMemoryGroupStore};
//! use ride_pool::application::{JoinGroupHandler, WritePath};
//!
//! let store = Arc::new(InMemoryGroupStore::new());
//! let write_path = WritePath::new(store.clone(), Arc::new(InMemoryEventBus::new()), &EngineConfig::default());
//! let join = JoinGroupHandler::new(write_path);
//! ```

mod in_memory_group_store;

pub use in_memory_group_store::InMemoryGroupStore;
