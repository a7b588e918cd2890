//! Push transport trait and delivery errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use torchi_entity::device::PushTarget;
use uuid::Uuid;

use crate::error::{AppError, ErrorKind};

/// Content of one push, independent of the device it goes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Notification title (the endpoint name).
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Ledger id the device reports its reaction against.
    pub notification_id: Option<Uuid>,
    /// Reaction buttons to render.
    pub actions: Vec<String>,
}

/// Why a single delivery attempt failed.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The push service no longer knows this subscription (404/410).
    #[error("subscription is gone")]
    Gone,
    /// The push service refused the message.
    #[error("push service rejected the message with status {status}: {body}")]
    Rejected {
        /// HTTP status returned by the push service.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },
    /// The request never got a response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// VAPID signing or payload encryption failed.
    #[error("encoding failure: {0}")]
    Encoding(String),
}

impl From<DeliveryError> for AppError {
    fn from(err: DeliveryError) -> Self {
        let message = format!("Push delivery failed: {err}");
        Self::with_source(ErrorKind::Delivery, message, err)
    }
}

/// Delivers one payload to one device.
#[async_trait]
pub trait PushTransport: Send + Sync + 'static {
    /// Attempt a single delivery. No retries.
    async fn deliver(
        &self,
        target: &PushTarget,
        message: &PushMessage,
    ) -> Result<(), DeliveryError>;
}
