//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use torchi_entity::device::PushTarget;
use torchi_service::SubscriptionKeys;

/// Form body of `POST /api/push/{token}/ask`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AskForm {
    /// Message text.
    #[serde(default)]
    #[validate(length(min = 1, message = "Message is required"))]
    pub msg: String,
    /// Comma-separated reaction choices.
    pub actions: Option<String>,
    /// Seconds to wait; unparseable values fall back to the default.
    pub timeout: Option<String>,
}

impl AskForm {
    /// Reaction choices, trimmed, blanks dropped.
    pub fn action_list(&self) -> Vec<String> {
        self.actions
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect()
    }

    /// Requested timeout in seconds, if it parses.
    pub fn timeout_seconds(&self) -> Option<u64> {
        self.timeout.as_deref().and_then(|t| t.trim().parse().ok())
    }
}

/// Reaction reported by a device.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReactRequest {
    /// The chosen action text.
    #[validate(length(min = 1, max = 200, message = "Reaction must be 1-200 characters"))]
    pub reaction: String,
}

/// One-off push to an explicit browser subscription.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DemoPushRequest {
    /// Push service URL.
    #[validate(url(message = "Endpoint must be a URL"))]
    pub endpoint: String,
    /// Auth secret.
    #[validate(length(min = 1))]
    pub auth: String,
    /// Browser public key.
    #[validate(length(min = 1))]
    pub p256dh: String,
    /// Message body.
    #[serde(default)]
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

impl DemoPushRequest {
    /// The device to push to.
    pub fn target(&self) -> PushTarget {
        PushTarget {
            endpoint: self.endpoint.clone(),
            p256dh: self.p256dh.clone(),
            auth: self.auth.clone(),
        }
    }
}

/// Mark notifications read up to and including `last_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadUntilRequest {
    /// Newest notification id the user has seen.
    pub last_id: Uuid,
}

/// Create an endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEndpointRequest {
    /// Display name for the endpoint.
    #[validate(length(min = 1, max = 100, message = "Service name must be 1-100 characters"))]
    pub service_name: String,
}

/// Browser subscription keys.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubscriptionKeysDto {
    /// Browser public key.
    #[validate(length(min = 1))]
    pub p256dh: String,
    /// Auth secret.
    #[validate(length(min = 1))]
    pub auth: String,
}

/// Body of `POST /subscriptions`, as serialized by `PushSubscription.toJSON()`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubscribeRequest {
    /// Push service URL.
    #[validate(url(message = "Endpoint must be a URL"))]
    pub endpoint: String,
    /// Encryption keys.
    #[validate(nested)]
    pub keys: SubscriptionKeysDto,
}

impl From<SubscribeRequest> for SubscriptionKeys {
    fn from(req: SubscribeRequest) -> Self {
        Self {
            endpoint: req.endpoint,
            p256dh: req.keys.p256dh,
            auth: req.keys.auth,
        }
    }
}

/// Body of `POST /subscriptions/unsubscribe`. Keys may be sent but are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UnsubscribeRequest {
    /// Push service URL.
    #[validate(length(min = 1))]
    pub endpoint: String,
}
