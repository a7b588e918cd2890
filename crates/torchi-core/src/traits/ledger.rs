//! Notification ledger trait.

use async_trait::async_trait;
use torchi_entity::notification::{NewNotification, Notification, NotificationStatus};
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::cursor::CursorRequest;

/// Persistent record of every dispatch and its reaction.
///
/// Implementations serialize writes per row; callers never hold locks
/// across these calls.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Insert a new ledger row.
    async fn create(&self, notification: NewNotification) -> AppResult<Notification>;

    /// Move a `pending` row to `to`.
    ///
    /// Fails with `Conflict` if the row is no longer pending and
    /// `NotFound` if it does not exist.
    async fn update_status(&self, id: Uuid, to: NotificationStatus) -> AppResult<()>;

    /// Store reaction text and time on a non-deleted row.
    ///
    /// Returns `false` when no such row exists.
    async fn save_reaction(&self, id: Uuid, reaction: &str) -> AppResult<bool>;

    /// Fetch a row by id, including deleted rows.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>>;

    /// Non-deleted rows of a user, newest first, strictly after the cursor.
    async fn list_by_cursor(
        &self,
        user_id: Uuid,
        request: &CursorRequest,
    ) -> AppResult<Vec<Notification>>;

    /// Mark unread rows with `id <= last_id` as read. Returns the count.
    async fn mark_read_until(&self, user_id: Uuid, last_id: Uuid) -> AppResult<u64>;

    /// Soft-delete one row owned by the user. Returns whether it was found.
    async fn mark_deleted(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
