//! Event bus adapters.
//!
//! - `InMemoryEventBus` - Synchronous, in-process bus with event capture

mod in_memory;

pub use in_memory::InMemoryEventBus;
