//! # torchi-service
//!
//! Business logic for Torchi. The push module holds the engine: the
//! orchestrator that fans a message out to a user's devices and the reply
//! correlator that lets a caller block until one of them reacts. The other
//! modules serve the authenticated user's own data.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod endpoint;
pub mod notification;
pub mod push;
pub mod subscription;

pub use context::RequestContext;
pub use endpoint::EndpointService;
pub use notification::NotificationService;
pub use push::{DispatchError, PushOrchestrator, ReplyCorrelator};
pub use subscription::{SubscriptionKeys, SubscriptionService};
