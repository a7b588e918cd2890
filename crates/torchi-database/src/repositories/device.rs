//! Push device registry repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use torchi_core::error::{AppError, ErrorKind};
use torchi_core::result::AppResult;
use torchi_core::traits::DeviceRegistry;
use torchi_entity::device::{DeviceCredential, NewDeviceCredential};

use super::map_write_error;

/// PostgreSQL-backed device registry.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Create a new device repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceRegistry for DeviceRepository {
    async fn devices_of(&self, user_id: Uuid) -> AppResult<Vec<DeviceCredential>> {
        sqlx::query_as::<_, DeviceCredential>(
            "SELECT * FROM push_devices WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list devices", e))
    }

    async fn upsert(&self, credential: NewDeviceCredential) -> AppResult<DeviceCredential> {
        sqlx::query_as::<_, DeviceCredential>(
            "INSERT INTO push_devices (user_id, endpoint, p256dh, auth) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (endpoint) DO UPDATE \
             SET user_id = EXCLUDED.user_id, p256dh = EXCLUDED.p256dh, auth = EXCLUDED.auth \
             RETURNING *",
        )
        .bind(credential.user_id)
        .bind(&credential.endpoint)
        .bind(&credential.p256dh)
        .bind(&credential.auth)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to store device"))
    }

    async fn remove(&self, user_id: Uuid, endpoint: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM push_devices WHERE user_id = $1 AND endpoint = $2")
            .bind(user_id)
            .bind(endpoint)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove device", e))?;
        Ok(result.rows_affected() > 0)
    }
}
