//! Application builder: wires router, middleware, and state into an Axum app.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use torchi_core::config::{AppConfig, CorsConfig};
use torchi_core::error::{AppError, ErrorKind};
use torchi_core::traits::PushTransport;
use torchi_database::Backend;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Runs the Torchi server until a shutdown signal arrives.
///
/// In-flight requests get `server.shutdown_grace_seconds` to finish; callers
/// still waiting for a reaction after that are dropped.
pub async fn run_server(
    config: AppConfig,
    backend: Backend,
    transport: Arc<dyn PushTransport>,
) -> Result<(), AppError> {
    info!("Starting Torchi server...");

    // ── Step 1: Wire services ────────────────────────────────────
    let cors = config.server.cors.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config, backend, transport);

    // ── Step 2: Build router ─────────────────────────────────────
    let app = build_app(state, &cors);

    // ── Step 3: Bind ─────────────────────────────────────────────
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Failed to bind {addr}"),
            e,
        )
    })?;
    info!(address = %addr, "Torchi server listening");

    // ── Step 4: Serve until shutdown ─────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(());
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;
            info!("Server stopped");
        }
        _ = async {
            if shutdown_rx.changed().await.is_ok() {
                tokio::time::sleep(grace).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            warn!(
                grace_seconds = grace.as_secs(),
                "Shutdown grace period elapsed; dropping in-flight requests"
            );
        }
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
