//! Notification history listing and maintenance.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use torchi_core::error::AppError;
use torchi_core::traits::NotificationStore;
use torchi_core::types::{CursorPage, CursorRequest};
use torchi_entity::notification::Notification;

use crate::context::RequestContext;

/// Lists, marks read, and hides the caller's notifications.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    /// One page of the caller's history, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        request: CursorRequest,
    ) -> Result<CursorPage<Notification>, AppError> {
        let items = self
            .notifications
            .list_by_cursor(ctx.user_id, &request)
            .await?;
        Ok(CursorPage::new(items, request.limit(), |n| n.id))
    }

    /// Mark everything up to and including `last_id` as read.
    pub async fn mark_read_until(
        &self,
        ctx: &RequestContext,
        last_id: Uuid,
    ) -> Result<u64, AppError> {
        let updated = self
            .notifications
            .mark_read_until(ctx.user_id, last_id)
            .await?;
        info!(user_id = %ctx.user_id, %last_id, updated, "Marked notifications read");
        Ok(updated)
    }

    /// Hide one notification from the caller's history.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        if !self.notifications.mark_deleted(ctx.user_id, id).await? {
            return Err(AppError::not_found(format!("Notification {id} not found")));
        }
        info!(user_id = %ctx.user_id, notification_id = %id, "Notification deleted");
        Ok(())
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}
