//! Request handlers grouped by domain.

pub mod endpoint;
pub mod health;
pub mod notification;
pub mod push;
pub mod subscription;
