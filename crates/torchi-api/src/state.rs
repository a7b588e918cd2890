//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use torchi_auth::JwtDecoder;
use torchi_core::config::AppConfig;
use torchi_core::traits::PushTransport;
use torchi_database::Backend;
use torchi_service::{
    EndpointService, NotificationService, PushOrchestrator, ReplyCorrelator, SubscriptionService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Storage backend (PostgreSQL or in-memory)
    pub backend: Backend,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Push dispatch and reply waiting
    pub orchestrator: Arc<PushOrchestrator>,
    /// Notification history
    pub notification_service: Arc<NotificationService>,
    /// Endpoint management
    pub endpoint_service: Arc<EndpointService>,
    /// Device subscriptions
    pub subscription_service: Arc<SubscriptionService>,
}

impl AppState {
    /// Wire services over `backend`, delivering through `transport`.
    pub fn new(config: AppConfig, backend: Backend, transport: Arc<dyn PushTransport>) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let orchestrator = Arc::new(PushOrchestrator::new(
            Arc::clone(&backend.endpoints),
            Arc::clone(&backend.devices),
            Arc::clone(&backend.notifications),
            transport,
            Arc::new(ReplyCorrelator::new()),
        ));
        let notification_service =
            Arc::new(NotificationService::new(Arc::clone(&backend.notifications)));
        let endpoint_service = Arc::new(EndpointService::new(Arc::clone(&backend.endpoints)));
        let subscription_service =
            Arc::new(SubscriptionService::new(Arc::clone(&backend.devices)));

        Self {
            config: Arc::new(config),
            backend,
            jwt_decoder,
            orchestrator,
            notification_service,
            endpoint_service,
            subscription_service,
        }
    }
}
