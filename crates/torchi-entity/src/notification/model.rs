//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::NotificationStatus;

/// One dispatch attempt and its eventual reaction.
///
/// A row is written once per dispatch call, never per device. Rows are
/// never physically removed; `is_deleted` only hides them from the owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Time-ordered (v7) identifier; also the reply correlation key.
    pub id: Uuid,
    /// The endpoint that triggered the dispatch, if it still exists.
    pub endpoint_id: Option<Uuid>,
    /// Endpoint display name at dispatch time.
    pub endpoint_name: String,
    /// The recipient user.
    pub user_id: Uuid,
    /// Message body.
    pub body: String,
    /// Reaction choices offered to the device, in display order.
    pub actions: Vec<String>,
    /// Lifecycle status.
    pub status: NotificationStatus,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the owner marked it as read.
    pub read_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// Reaction text reported by a device.
    pub reaction: Option<String>,
    /// When the reaction was recorded.
    pub reaction_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Check whether the endpoint was muted at dispatch time.
    pub fn is_mute(&self) -> bool {
        self.status == NotificationStatus::Mute
    }

    /// Check whether the owner has read the notification.
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// Fields supplied by the dispatcher when a ledger row is created.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Pre-generated identifier.
    pub id: Uuid,
    /// Owning endpoint.
    pub endpoint_id: Option<Uuid>,
    /// Endpoint display name.
    pub endpoint_name: String,
    /// Recipient user.
    pub user_id: Uuid,
    /// Message body.
    pub body: String,
    /// Allowed reaction actions.
    pub actions: Vec<String>,
    /// Initial status (`Pending` or `Mute`).
    pub status: NotificationStatus,
}

impl NewNotification {
    /// Build a new record with a fresh time-ordered id.
    ///
    /// The initial status is `Mute` when the endpoint has notifications
    /// disabled and `Pending` otherwise.
    pub fn new(
        endpoint_id: Uuid,
        endpoint_name: impl Into<String>,
        user_id: Uuid,
        body: impl Into<String>,
        actions: Vec<String>,
        muted: bool,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            endpoint_id: Some(endpoint_id),
            endpoint_name: endpoint_name.into(),
            user_id,
            body: body.into(),
            actions,
            status: if muted {
                NotificationStatus::Mute
            } else {
                NotificationStatus::Pending
            },
        }
    }

    /// Materialize the row as the in-memory backend stores it.
    pub fn into_notification(self, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: self.id,
            endpoint_id: self.endpoint_id,
            endpoint_name: self.endpoint_name,
            user_id: self.user_id,
            body: self.body,
            actions: self.actions,
            status: self.status,
            created_at,
            read_at: None,
            is_deleted: false,
            reaction: None,
            reaction_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_follows_mute_flag() {
        let user = Uuid::new_v4();
        let endpoint = Uuid::new_v4();
        let active = NewNotification::new(endpoint, "ci", user, "hi", vec![], false);
        let muted = NewNotification::new(endpoint, "ci", user, "hi", vec![], true);
        assert_eq!(active.status, NotificationStatus::Pending);
        assert_eq!(muted.status, NotificationStatus::Mute);
    }

    #[test]
    fn test_ids_are_time_ordered() {
        let user = Uuid::new_v4();
        let endpoint = Uuid::new_v4();
        let first = NewNotification::new(endpoint, "ci", user, "a", vec![], false);
        let second = NewNotification::new(endpoint, "ci", user, "b", vec![], false);
        assert!(second.id > first.id);
    }

    #[test]
    fn test_materialized_row_defaults() {
        let new = NewNotification::new(
            Uuid::new_v4(),
            "deploy",
            Uuid::new_v4(),
            "ship it?",
            vec!["yes".into(), "no".into()],
            true,
        );
        let row = new.into_notification(Utc::now());
        assert!(row.is_mute());
        assert!(!row.is_read());
        assert!(!row.is_deleted);
        assert_eq!(row.actions, vec!["yes", "no"]);
        assert!(row.reaction.is_none());
    }
}
