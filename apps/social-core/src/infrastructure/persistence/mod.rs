//! Persistence Adapters
//!
//! Storage implementations of the repository and store ports.

pub mod in_memory;
pub mod turso_store;

pub use in_memory::{InMemoryProfileRepository, InMemorySubscriptionStore, InMemoryTargetRepository};
pub use turso_store::TursoSubscriptionStore;
