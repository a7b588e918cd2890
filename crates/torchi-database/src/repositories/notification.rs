//! Notification ledger repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use torchi_core::error::{AppError, ErrorKind};
use torchi_core::result::AppResult;
use torchi_core::traits::NotificationStore;
use torchi_core::types::CursorRequest;
use torchi_entity::notification::{NewNotification, Notification, NotificationStatus};

/// PostgreSQL-backed notification ledger.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build an `ILIKE` pattern that matches `text` literally.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, n: NewNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, endpoint_id, endpoint_name, user_id, body, actions, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(n.id)
        .bind(n.endpoint_id)
        .bind(&n.endpoint_name)
        .bind(n.user_id)
        .bind(&n.body)
        .bind(&n.actions)
        .bind(n.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn update_status(&self, id: Uuid, to: NotificationStatus) -> AppResult<()> {
        if !NotificationStatus::Pending.can_transition_to(to) {
            return Err(AppError::conflict(format!(
                "Notification {id} cannot move to {to}"
            )));
        }

        let result = sqlx::query(
            "UPDATE notifications SET status = $2 WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update status", e))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let current: Option<NotificationStatus> =
            sqlx::query_scalar("SELECT status FROM notifications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to read status", e)
                })?;

        match current {
            None => Err(AppError::not_found(format!("Notification {id} not found"))),
            Some(from) => Err(AppError::conflict(format!(
                "Notification {id} cannot move from {from} to {to}"
            ))),
        }
    }

    async fn save_reaction(&self, id: Uuid, reaction: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET reaction = $2, reaction_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(reaction)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save reaction", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find notification", e))
    }

    async fn list_by_cursor(
        &self,
        user_id: Uuid,
        request: &CursorRequest,
    ) -> AppResult<Vec<Notification>> {
        let pattern = request.text.as_deref().map(like_pattern);
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE user_id = $1 AND is_deleted = FALSE \
               AND ($2::uuid IS NULL OR id < $2) \
               AND ($3::uuid IS NULL OR endpoint_id = $3) \
               AND ($4::text IS NULL OR body ILIKE $4) \
             ORDER BY id DESC LIMIT $5",
        )
        .bind(user_id)
        .bind(request.last_id)
        .bind(request.endpoint_id)
        .bind(pattern)
        .bind(request.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn mark_read_until(&self, user_id: Uuid, last_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() \
             WHERE user_id = $1 AND id <= $2 AND read_at IS NULL AND is_deleted = FALSE",
        )
        .bind(user_id)
        .bind(last_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_deleted(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_deleted = TRUE \
             WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
