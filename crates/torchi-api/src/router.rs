//! Route definitions for the Torchi HTTP API.
//!
//! The token-authenticated push API lives under `/api`; routes for the
//! signed-in user sit at the root. The router receives `AppState` and passes
//! it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes.
///
/// Every route except the reply-waiting one is bounded by
/// `server.request_timeout_seconds`; that one is bounded by its own
/// reply deadline.
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let body_limit = state.config.server.body_limit_bytes;

    let bounded = Router::new()
        .merge(push_routes())
        .merge(notification_routes())
        .merge(endpoint_routes())
        .merge(subscription_routes())
        .merge(health_routes())
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .merge(bounded)
        .merge(ask_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Token-authenticated push API
fn push_routes() -> Router<AppState> {
    Router::new()
        .route("/api/push/{token}", post(handlers::push::push))
        .route("/api/react/{notification_id}", post(handlers::push::react))
        .route("/api/push-demo", post(handlers::push::demo_push))
}

/// Blocking ask; outlives the ordinary request timeout
fn ask_routes() -> Router<AppState> {
    Router::new().route("/api/push/{token}/ask", post(handlers::push::ask))
}

/// Notification history
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/read-until",
            post(handlers::notification::read_until),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
}

/// Endpoint CRUD and muting
fn endpoint_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/endpoints",
            get(handlers::endpoint::list_endpoints).post(handlers::endpoint::create_endpoint),
        )
        .route(
            "/endpoints/{token}",
            delete(handlers::endpoint::delete_endpoint),
        )
        .route(
            "/endpoints/{token}/mute",
            put(handlers::endpoint::mute_endpoint),
        )
        .route(
            "/endpoints/{token}/unmute",
            put(handlers::endpoint::unmute_endpoint),
        )
}

/// Browser push subscriptions
fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            get(handlers::subscription::list_subscriptions)
                .post(handlers::subscription::subscribe),
        )
        .route(
            "/subscriptions/unsubscribe",
            post(handlers::subscription::unsubscribe),
        )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
