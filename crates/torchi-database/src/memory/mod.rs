//! In-memory storage backend for single-process deployments and tests.

mod store;

pub use store::MemoryStore;
