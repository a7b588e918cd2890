//! Notification lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delivery status of a notification.
///
/// `Pending` and `Mute` are the two initial states. `Sent` and `Failed`
/// are reachable from `Pending` only; `Mute` never transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Created for an active endpoint, fan-out not yet finished.
    Pending,
    /// Every device in the fan-out accepted the push.
    Sent,
    /// The fan-out aborted on a delivery error.
    Failed,
    /// The endpoint had notifications disabled; nothing was delivered.
    Mute,
}

impl NotificationStatus {
    /// Check whether `self -> next` is a legal lifecycle transition.
    pub fn can_transition_to(&self, next: NotificationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Sent) | (Self::Pending, Self::Failed)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Mute => "mute",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "mute" => Ok(Self::Mute),
            other => Err(format!("unknown notification status: {other}")),
        }
    }
}
