//! Read side of the notification ledger for its owner.

pub mod service;

pub use service::NotificationService;
