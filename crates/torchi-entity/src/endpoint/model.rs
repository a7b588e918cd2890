//! Endpoint entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user-named public token that third parties post messages to.
///
/// One endpoint fans out to every device credential of its owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Endpoint {
    /// Unique endpoint identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Display name chosen by the user (the push title).
    pub name: String,
    /// Opaque public token.
    pub token: String,
    /// Set while notifications for this endpoint are muted.
    pub notification_disabled_at: Option<DateTime<Utc>>,
    /// When the endpoint was created.
    pub created_at: DateTime<Utc>,
}

impl Endpoint {
    /// Check if pushes through this endpoint are muted.
    pub fn is_muted(&self) -> bool {
        self.notification_disabled_at.is_some()
    }
}
