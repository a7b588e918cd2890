//! Storage backend selection.

use std::sync::Arc;

use tracing::info;

use torchi_core::config::DatabaseConfig;
use torchi_core::error::AppError;
use torchi_core::result::AppResult;
use torchi_core::traits::{DeviceRegistry, EndpointDirectory, NotificationStore};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{DeviceRepository, EndpointRepository, NotificationRepository};

/// The three stores the engine needs, built from one provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Clone)]
pub struct Backend {
    /// Notification ledger.
    pub notifications: Arc<dyn NotificationStore>,
    /// Endpoint directory.
    pub endpoints: Arc<dyn EndpointDirectory>,
    /// Device registry.
    pub devices: Arc<dyn DeviceRegistry>,
    /// Pool to close on shutdown, when backed by PostgreSQL.
    pool: Option<DatabasePool>,
}

impl Backend {
    /// Create the backend named by `config.backend`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL storage backend");
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                let pool = db.pool().clone();
                Ok(Self {
                    notifications: Arc::new(NotificationRepository::new(pool.clone())),
                    endpoints: Arc::new(EndpointRepository::new(pool.clone())),
                    devices: Arc::new(DeviceRepository::new(pool)),
                    pool: Some(db),
                })
            }
            "memory" => {
                info!("Initializing in-memory storage backend");
                Ok(Self::memory())
            }
            other => Err(AppError::configuration(format!(
                "Unknown storage backend: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Build an in-memory backend.
    pub fn memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    /// Build a backend over an existing in-memory store (for testing).
    pub fn from_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            notifications: store.clone(),
            endpoints: store.clone(),
            devices: store,
            pool: None,
        }
    }

    /// Name of the active provider.
    pub fn provider(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("provider", &self.provider())
            .finish()
    }
}
