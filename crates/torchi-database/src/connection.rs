//! PostgreSQL connection pool.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use torchi_core::config::DatabaseConfig;
use torchi_core::error::{AppError, ErrorKind};

/// Pool handle owned by the postgres [`Backend`](crate::Backend).
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Parse `database.url` and open the pool.
    ///
    /// A missing or malformed URL is a `Configuration` error; a server that
    /// cannot be reached is a `Database` error.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options = connect_options(&config.url)?;

        info!(
            host = options.get_host(),
            port = options.get_port(),
            database = options.get_database().unwrap_or_default(),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "PostgreSQL unreachable", e))?;

        Ok(Self { pool })
    }

    /// The underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for checked-out connections and close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

fn connect_options(url: &str) -> Result<PgConnectOptions, AppError> {
    if url.trim().is_empty() {
        return Err(AppError::configuration(
            "database.url is required for the postgres backend",
        ));
    }
    PgConnectOptions::from_str(url).map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, "database.url is not a valid URL", e)
    })
}
