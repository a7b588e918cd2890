//! Endpoint directory repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use torchi_core::error::{AppError, ErrorKind};
use torchi_core::result::AppResult;
use torchi_core::traits::EndpointDirectory;
use torchi_entity::endpoint::Endpoint;

use super::map_write_error;

/// PostgreSQL-backed endpoint directory.
#[derive(Debug, Clone)]
pub struct EndpointRepository {
    pool: PgPool,
}

impl EndpointRepository {
    /// Create a new endpoint repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EndpointDirectory for EndpointRepository {
    async fn resolve(&self, token: &str) -> AppResult<Option<Endpoint>> {
        sqlx::query_as::<_, Endpoint>("SELECT * FROM endpoints WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve endpoint", e))
    }

    async fn insert(&self, user_id: Uuid, name: &str, token: &str) -> AppResult<Endpoint> {
        sqlx::query_as::<_, Endpoint>(
            "INSERT INTO endpoints (user_id, name, token) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(name)
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create endpoint"))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Endpoint>> {
        sqlx::query_as::<_, Endpoint>(
            "SELECT * FROM endpoints WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list endpoints", e))
    }

    async fn remove_by_token(&self, token: &str, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM endpoints WHERE token = $1 AND user_id = $2")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove endpoint", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_muted(
        &self,
        token: &str,
        user_id: Uuid,
        disabled_at: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Endpoint>> {
        sqlx::query_as::<_, Endpoint>(
            "UPDATE endpoints SET notification_disabled_at = $3 \
             WHERE token = $1 AND user_id = $2 RETURNING *",
        )
        .bind(token)
        .bind(user_id)
        .bind(disabled_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update mute state", e))
    }
}
