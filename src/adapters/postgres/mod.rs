//! PostgreSQL adapters - Database implementations for storage ports.
//!
//! - `PostgresGroupStore` - Version-checked group/ride documents, also the
//!   read side for queries

mod group_store;

pub use group_store::PostgresGroupStore;
