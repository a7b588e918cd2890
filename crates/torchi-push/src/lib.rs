//! # torchi-push
//!
//! Delivers notifications to browsers over the Web Push protocol: VAPID
//! signing (RFC 8292) and payload encryption (RFC 8291) come from the
//! `web-push` crate, the HTTP request is sent with `reqwest`.

pub mod payload;
pub mod vapid;
pub mod webpush;

pub use payload::PushPayload;
pub use webpush::WebPushTransport;
