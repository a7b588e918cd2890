//! Device credential registration and removal.

use std::sync::Arc;

use tracing::info;

use torchi_core::error::AppError;
use torchi_core::traits::DeviceRegistry;
use torchi_entity::device::{DeviceCredential, NewDeviceCredential};

use crate::context::RequestContext;

/// Keys a browser reports from `PushManager.subscribe()`.
#[derive(Debug, Clone)]
pub struct SubscriptionKeys {
    /// Push service URL.
    pub endpoint: String,
    /// Browser public key.
    pub p256dh: String,
    /// Auth secret.
    pub auth: String,
}

/// Stores and removes the caller's device credentials.
#[derive(Clone)]
pub struct SubscriptionService {
    devices: Arc<dyn DeviceRegistry>,
}

impl SubscriptionService {
    /// Creates a new subscription service.
    pub fn new(devices: Arc<dyn DeviceRegistry>) -> Self {
        Self { devices }
    }

    /// Register (or re-register) a browser for the caller.
    pub async fn subscribe(
        &self,
        ctx: &RequestContext,
        keys: SubscriptionKeys,
    ) -> Result<DeviceCredential, AppError> {
        let device = self
            .devices
            .upsert(NewDeviceCredential {
                user_id: ctx.user_id,
                endpoint: keys.endpoint,
                p256dh: keys.p256dh,
                auth: keys.auth,
            })
            .await?;
        info!(user_id = %ctx.user_id, device_id = %device.id, "Device subscribed");
        Ok(device)
    }

    /// Remove a browser. Returns whether the caller owned it.
    pub async fn unsubscribe(&self, ctx: &RequestContext, endpoint: &str) -> Result<bool, AppError> {
        let removed = self.devices.remove(ctx.user_id, endpoint).await?;
        info!(user_id = %ctx.user_id, removed, "Device unsubscribed");
        Ok(removed)
    }

    /// The caller's registered devices.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<DeviceCredential>, AppError> {
        self.devices.devices_of(ctx.user_id).await
    }
}

impl std::fmt::Debug for SubscriptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionService").finish_non_exhaustive()
    }
}
