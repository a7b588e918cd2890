//! # torchi-database
//!
//! Storage for the notification ledger, endpoint directory, and device
//! registry. PostgreSQL repositories for production, an in-memory store
//! for single-process runs and tests, and [`Backend`] to choose between
//! them from configuration.

pub mod backend;
pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use backend::Backend;
pub use connection::DatabasePool;
pub use memory::MemoryStore;
