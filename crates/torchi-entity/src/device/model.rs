//! Push device credential model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A browser push subscription owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceCredential {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Push service URL issued by the browser. Unique across devices.
    pub endpoint: String,
    /// Browser P-256 ECDH public key (base64url).
    pub p256dh: String,
    /// Shared auth secret (base64url).
    pub auth: String,
    /// When the subscription was first stored.
    pub created_at: DateTime<Utc>,
}

impl DeviceCredential {
    /// The address and keys the transport needs for one delivery.
    pub fn target(&self) -> PushTarget {
        PushTarget {
            endpoint: self.endpoint.clone(),
            p256dh: self.p256dh.clone(),
            auth: self.auth.clone(),
        }
    }
}

/// Subscription data received from a browser on subscribe/unsubscribe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDeviceCredential {
    /// Owning user (from the auth context).
    pub user_id: Uuid,
    /// Push service URL.
    pub endpoint: String,
    /// Browser public key.
    pub p256dh: String,
    /// Auth secret.
    pub auth: String,
}

/// Transport-level address of a single device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTarget {
    /// Push service URL.
    pub endpoint: String,
    /// Browser public key.
    pub p256dh: String,
    /// Auth secret.
    pub auth: String,
}
