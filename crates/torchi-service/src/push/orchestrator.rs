//! Endpoint-token dispatch: ledger record, device fan-out, and the
//! blocking request/reply variant.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use torchi_core::error::AppError;
use torchi_core::result::AppResult;
use torchi_core::traits::{
    DeviceRegistry, EndpointDirectory, NotificationStore, PushMessage, PushTransport,
};
use torchi_entity::device::PushTarget;
use torchi_entity::endpoint::Endpoint;
use torchi_entity::notification::{NewNotification, Notification, NotificationStatus};

use super::correlator::ReplyCorrelator;

/// Title used for subscription test pushes.
const DEMO_TITLE: &str = "Demo";

/// A dispatch that stopped early, with the number of devices already reached.
#[derive(Debug, Error)]
#[error("{error} ({delivered} delivered before failure)")]
pub struct DispatchError {
    /// Successful deliveries before the failure.
    pub delivered: usize,
    /// The failure that stopped the fan-out.
    #[source]
    pub error: AppError,
}

impl DispatchError {
    fn before_fan_out(error: AppError) -> Self {
        Self {
            delivered: 0,
            error,
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        err.error
    }
}

/// Resolves endpoint tokens, records notifications, and fans them out.
#[derive(Clone)]
pub struct PushOrchestrator {
    endpoints: Arc<dyn EndpointDirectory>,
    devices: Arc<dyn DeviceRegistry>,
    notifications: Arc<dyn NotificationStore>,
    transport: Arc<dyn PushTransport>,
    correlator: Arc<ReplyCorrelator>,
}

impl std::fmt::Debug for PushOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushOrchestrator")
            .field("waiters", &self.correlator.len())
            .finish()
    }
}

impl PushOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        endpoints: Arc<dyn EndpointDirectory>,
        devices: Arc<dyn DeviceRegistry>,
        notifications: Arc<dyn NotificationStore>,
        transport: Arc<dyn PushTransport>,
        correlator: Arc<ReplyCorrelator>,
    ) -> Self {
        Self {
            endpoints,
            devices,
            notifications,
            transport,
            correlator,
        }
    }

    /// The waiter registry used by [`Self::dispatch_and_await_reply`].
    pub fn correlator(&self) -> &Arc<ReplyCorrelator> {
        &self.correlator
    }

    /// Deliver `body` to every device of the endpoint owner.
    ///
    /// Unknown tokens deliver nothing and are not an error. A muted endpoint
    /// gets a `mute` ledger row and no deliveries. Otherwise devices are
    /// tried in order and the first failure stops the fan-out; the error
    /// carries how many devices were reached.
    pub async fn dispatch(&self, token: &str, body: &str) -> Result<usize, DispatchError> {
        let Some(endpoint) = self
            .endpoints
            .resolve(token)
            .await
            .map_err(DispatchError::before_fan_out)?
        else {
            info!("Dispatch to unknown endpoint token ignored");
            return Ok(0);
        };

        let notification = self
            .record(&endpoint, body, Vec::new())
            .await
            .map_err(DispatchError::before_fan_out)?;

        if notification.is_mute() {
            info!(
                endpoint_id = %endpoint.id,
                notification_id = %notification.id,
                "Endpoint muted; notification recorded without delivery"
            );
            return Ok(0);
        }

        self.fan_out(&endpoint, &notification).await
    }

    /// Deliver `body` with reaction `actions` and wait for the first reaction.
    ///
    /// The waiter is registered before any device is contacted, so a
    /// reaction can never arrive too early to be seen. Muted endpoints skip
    /// delivery but still wait. `timeout` runs from the start of the call.
    pub async fn dispatch_and_await_reply(
        &self,
        token: &str,
        body: &str,
        actions: Vec<String>,
        timeout: Duration,
    ) -> AppResult<String> {
        let deadline = Instant::now() + timeout;

        let endpoint = self
            .endpoints
            .resolve(token)
            .await?
            .ok_or_else(|| AppError::not_found("Endpoint not found"))?;

        let notification = self.record(&endpoint, body, actions).await?;
        let waiter = self.correlator.register(notification.id)?;

        if !notification.is_mute() {
            self.fan_out(&endpoint, &notification).await?;
        }

        match waiter.wait_until(deadline).await {
            Ok(reaction) => {
                info!(notification_id = %notification.id, "Reaction received");
                Ok(reaction)
            }
            Err(err) => {
                info!(
                    notification_id = %notification.id,
                    timeout_seconds = timeout.as_secs(),
                    "Gave up waiting for a reaction"
                );
                Err(err)
            }
        }
    }

    /// Persist a reaction and hand it to the waiting caller, if any.
    ///
    /// Returns whether a waiter received it. Unknown or deleted
    /// notifications fail with `NotFound`.
    pub async fn record_reaction(&self, notification_id: Uuid, reaction: &str) -> AppResult<bool> {
        if !self
            .notifications
            .save_reaction(notification_id, reaction)
            .await?
        {
            return Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )));
        }

        let delivered = self
            .correlator
            .deliver(notification_id, reaction.to_string());
        info!(%notification_id, delivered, "Reaction recorded");
        Ok(delivered)
    }

    /// Push once to a caller-supplied device, bypassing ledger and waiters.
    pub async fn demo_push(&self, target: &PushTarget, body: &str) -> AppResult<()> {
        let message = PushMessage {
            title: DEMO_TITLE.to_string(),
            body: body.to_string(),
            notification_id: None,
            actions: Vec::new(),
        };
        self.transport.deliver(target, &message).await?;
        Ok(())
    }

    async fn record(
        &self,
        endpoint: &Endpoint,
        body: &str,
        actions: Vec<String>,
    ) -> AppResult<Notification> {
        let new = NewNotification::new(
            endpoint.id,
            endpoint.name.clone(),
            endpoint.user_id,
            body,
            actions,
            endpoint.is_muted(),
        );
        self.notifications.create(new).await
    }

    async fn fan_out(
        &self,
        endpoint: &Endpoint,
        notification: &Notification,
    ) -> Result<usize, DispatchError> {
        let devices = self
            .devices
            .devices_of(endpoint.user_id)
            .await
            .map_err(DispatchError::before_fan_out)?;

        let message = PushMessage {
            title: endpoint.name.clone(),
            body: notification.body.clone(),
            notification_id: Some(notification.id),
            actions: notification.actions.clone(),
        };

        let mut delivered = 0;
        for device in &devices {
            if let Err(err) = self.transport.deliver(&device.target(), &message).await {
                warn!(
                    notification_id = %notification.id,
                    device_id = %device.id,
                    delivered,
                    error = %err,
                    "Fan-out aborted"
                );
                self.settle(notification.id, NotificationStatus::Failed).await;
                return Err(DispatchError {
                    delivered,
                    error: err.into(),
                });
            }
            delivered += 1;
        }

        self.settle(notification.id, NotificationStatus::Sent).await;
        info!(
            endpoint_id = %endpoint.id,
            notification_id = %notification.id,
            delivered,
            "Dispatch complete"
        );
        Ok(delivered)
    }

    /// Final status write; failure here never changes the dispatch result.
    async fn settle(&self, id: Uuid, status: NotificationStatus) {
        if let Err(err) = self.notifications.update_status(id, status).await {
            error!(notification_id = %id, %status, error = %err, "Failed to update notification status");
        }
    }
}
