//! Notification domain entities.

pub mod model;
pub mod status;

pub use model::{NewNotification, Notification};
pub use status::NotificationStatus;
