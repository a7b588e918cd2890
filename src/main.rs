//! Torchi Server: push notifications that can wait for a reply.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use torchi_core::config::AppConfig;
use torchi_core::error::AppError;
use torchi_core::traits::PushTransport;
use torchi_database::Backend;
use torchi_push::WebPushTransport;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `TORCHI_ENV` overlay, and `TORCHI__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TORCHI_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Torchi");

    if config.auth.jwt_secret.trim().is_empty() {
        return Err(AppError::configuration("auth.jwt_secret must not be empty"));
    }
    if config.auth.jwt_secret == "CHANGE_ME_IN_PRODUCTION" {
        tracing::warn!("auth.jwt_secret is the built-in placeholder; set TORCHI__AUTH__JWT_SECRET");
    }

    // ── Step 1: Storage backend + migrations ─────────────────────
    let backend = Backend::connect(&config.database).await?;

    // ── Step 2: Push transport ───────────────────────────────────
    let transport: Arc<dyn PushTransport> = Arc::new(WebPushTransport::new(&config.push)?);

    // ── Step 3: Serve ────────────────────────────────────────────
    let result = torchi_api::run_server(config, backend.clone(), transport).await;

    // ── Step 4: Release resources ────────────────────────────────
    backend.close().await;
    tracing::info!("Torchi server shut down");
    result
}
