//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use torchi_entity::device::DeviceCredential;
use torchi_entity::endpoint::Endpoint;
use torchi_entity::notification::{Notification, NotificationStatus};

/// Result of a plain dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResponse {
    /// Devices reached.
    pub sent: usize,
}

/// Result of recording a reaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactResponse {
    /// Whether a waiting caller received the reaction.
    pub delivered: bool,
}

/// Body returned when a waiting caller gives up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Outcome marker.
    pub status: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Count of affected rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of rows changed.
    pub updated: u64,
}

/// Notification as shown in the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    /// Notification ID.
    pub id: Uuid,
    /// Endpoint ID, if the endpoint still exists.
    pub endpoint_id: Option<Uuid>,
    /// Endpoint name at dispatch time.
    pub endpoint_name: String,
    /// Message body.
    pub body: String,
    /// Reaction choices.
    pub actions: Vec<String>,
    /// Lifecycle status.
    pub status: NotificationStatus,
    /// Whether the user has read it.
    pub is_read: bool,
    /// Reaction, if any.
    pub reaction: Option<String>,
    /// When the reaction arrived.
    pub reaction_at: Option<DateTime<Utc>>,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        let is_read = n.is_read();
        Self {
            id: n.id,
            endpoint_id: n.endpoint_id,
            endpoint_name: n.endpoint_name,
            body: n.body,
            actions: n.actions,
            status: n.status,
            is_read,
            reaction: n.reaction,
            reaction_at: n.reaction_at,
            created_at: n.created_at,
        }
    }
}

/// Endpoint owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointResponse {
    /// Endpoint ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Public token used in push URLs.
    pub token: String,
    /// Whether deliveries are suppressed.
    pub muted: bool,
    /// When it was muted.
    pub notification_disabled_at: Option<DateTime<Utc>>,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Endpoint> for EndpointResponse {
    fn from(e: Endpoint) -> Self {
        let muted = e.is_muted();
        Self {
            id: e.id,
            name: e.name,
            token: e.token,
            muted,
            notification_disabled_at: e.notification_disabled_at,
            created_at: e.created_at,
        }
    }
}

/// Registered device. Keys are never echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    /// Device ID.
    pub id: Uuid,
    /// Push service URL.
    pub endpoint: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<DeviceCredential> for SubscriptionResponse {
    fn from(d: DeviceCredential) -> Self {
        Self {
            id: d.id,
            endpoint: d.endpoint,
            created_at: d.created_at,
        }
    }
}

/// Result of removing a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribeResponse {
    /// Whether a device was removed.
    pub removed: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Active storage provider.
    pub backend: String,
    /// Whether the storage backend answered.
    pub database: bool,
    /// Callers currently waiting for a reaction.
    pub waiting_replies: usize,
}
