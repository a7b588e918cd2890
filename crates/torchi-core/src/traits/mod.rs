//! Collaborator traits the push engine is written against.
//!
//! Storage-backed traits are implemented in `torchi-database` (PostgreSQL
//! and in-memory); the transport is implemented in `torchi-push`.

pub mod device;
pub mod endpoint;
pub mod ledger;
pub mod transport;

pub use device::DeviceRegistry;
pub use endpoint::EndpointDirectory;
pub use ledger::NotificationStore;
pub use transport::{DeliveryError, PushMessage, PushTransport};
