//! Browser push subscription management.

pub mod service;

pub use service::{SubscriptionKeys, SubscriptionService};
