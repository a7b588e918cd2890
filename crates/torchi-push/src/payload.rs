//! JSON document the service worker receives.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use torchi_core::traits::PushMessage;

/// Decrypted push body as seen by the browser.
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload<'a> {
    /// Notification title.
    pub title: &'a str,
    /// Notification body.
    pub body: &'a str,
    /// Data the service worker needs to render buttons and post the reaction.
    pub data: PushData<'a>,
}

/// The `data` member of [`PushPayload`].
#[derive(Debug, Clone, Serialize)]
pub struct PushData<'a> {
    /// Ledger id to react against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<Uuid>,
    /// Reaction buttons.
    pub actions: &'a [String],
    /// Page opened when the notification is clicked.
    pub url: &'static str,
    /// Unix seconds at send time.
    pub timestamp: i64,
}

impl<'a> PushPayload<'a> {
    /// Build the payload for a message.
    pub fn from_message(message: &'a PushMessage) -> Self {
        Self {
            title: &message.title,
            body: &message.body,
            data: PushData {
                notification_id: message.notification_id,
                actions: &message.actions,
                url: "/",
                timestamp: Utc::now().timestamp(),
            },
        }
    }

    /// Serialize to bytes for encryption.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
