//! In-memory implementation of the ledger, directory, and registry traits.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use torchi_core::error::AppError;
use torchi_core::result::AppResult;
use torchi_core::traits::{DeviceRegistry, EndpointDirectory, NotificationStore};
use torchi_core::types::CursorRequest;
use torchi_entity::device::{DeviceCredential, NewDeviceCredential};
use torchi_entity::endpoint::Endpoint;
use torchi_entity::notification::{NewNotification, Notification, NotificationStatus};

#[derive(Debug, Default)]
struct InnerState {
    /// Ledger keyed by time-ordered id, so iteration order is creation order.
    notifications: BTreeMap<Uuid, Notification>,
    /// Endpoints keyed by token.
    endpoints: HashMap<String, Endpoint>,
    /// Devices keyed by push URL.
    devices: HashMap<String, DeviceCredential>,
}

/// All three stores behind one `RwLock`.
///
/// Data does not survive a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, notification: NewNotification) -> AppResult<Notification> {
        let mut state = self.state.write().await;
        if state.notifications.contains_key(&notification.id) {
            return Err(AppError::conflict(format!(
                "Notification {} already exists",
                notification.id
            )));
        }
        let row = notification.into_notification(Utc::now());
        state.notifications.insert(row.id, row.clone());
        debug!(notification_id = %row.id, status = %row.status, "Stored notification");
        Ok(row)
    }

    async fn update_status(&self, id: Uuid, to: NotificationStatus) -> AppResult<()> {
        let mut state = self.state.write().await;
        let row = state
            .notifications
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        if !row.status.can_transition_to(to) {
            return Err(AppError::conflict(format!(
                "Notification {id} cannot move from {} to {to}",
                row.status
            )));
        }
        row.status = to;
        Ok(())
    }

    async fn save_reaction(&self, id: Uuid, reaction: &str) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.notifications.get_mut(&id) {
            Some(row) if !row.is_deleted => {
                row.reaction = Some(reaction.to_string());
                row.reaction_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        Ok(self.state.read().await.notifications.get(&id).cloned())
    }

    async fn list_by_cursor(
        &self,
        user_id: Uuid,
        request: &CursorRequest,
    ) -> AppResult<Vec<Notification>> {
        let state = self.state.read().await;
        let needle = request.text.as_deref().map(str::to_lowercase);
        let limit = usize::try_from(request.limit()).unwrap_or_default();

        let range = match request.last_id {
            Some(last) => state.notifications.range(..last),
            None => state.notifications.range(..),
        };

        Ok(range
            .rev()
            .map(|(_, row)| row)
            .filter(|row| row.user_id == user_id && !row.is_deleted)
            .filter(|row| request.endpoint_id.is_none() || row.endpoint_id == request.endpoint_id)
            .filter(|row| {
                needle
                    .as_deref()
                    .is_none_or(|n| row.body.to_lowercase().contains(n))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn mark_read_until(&self, user_id: Uuid, last_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut count = 0;
        for row in state.notifications.range_mut(..=last_id).map(|(_, row)| row) {
            if row.user_id == user_id && !row.is_deleted && row.read_at.is_none() {
                row.read_at = Some(now);
                count += 1;
            }
        }
        Ok(count)
    }

    async fn mark_deleted(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.notifications.get_mut(&id) {
            Some(row) if row.user_id == user_id && !row.is_deleted => {
                row.is_deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl EndpointDirectory for MemoryStore {
    async fn resolve(&self, token: &str) -> AppResult<Option<Endpoint>> {
        Ok(self.state.read().await.endpoints.get(token).cloned())
    }

    async fn insert(&self, user_id: Uuid, name: &str, token: &str) -> AppResult<Endpoint> {
        let mut state = self.state.write().await;
        if state.endpoints.contains_key(token) {
            return Err(AppError::conflict("Endpoint token already exists"));
        }
        let endpoint = Endpoint {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            token: token.to_string(),
            notification_disabled_at: None,
            created_at: Utc::now(),
        };
        state.endpoints.insert(token.to_string(), endpoint.clone());
        Ok(endpoint)
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Endpoint>> {
        let state = self.state.read().await;
        let mut endpoints: Vec<Endpoint> = state
            .endpoints
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        endpoints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(endpoints)
    }

    async fn remove_by_token(&self, token: &str, user_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .endpoints
            .get(token)
            .is_some_and(|e| e.user_id == user_id);
        if !owned {
            return Ok(false);
        }
        if let Some(removed) = state.endpoints.remove(token) {
            for row in state.notifications.values_mut() {
                if row.endpoint_id == Some(removed.id) {
                    row.endpoint_id = None;
                }
            }
        }
        Ok(true)
    }

    async fn set_muted(
        &self,
        token: &str,
        user_id: Uuid,
        disabled_at: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Endpoint>> {
        let mut state = self.state.write().await;
        match state.endpoints.get_mut(token) {
            Some(endpoint) if endpoint.user_id == user_id => {
                endpoint.notification_disabled_at = disabled_at;
                Ok(Some(endpoint.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl DeviceRegistry for MemoryStore {
    async fn devices_of(&self, user_id: Uuid) -> AppResult<Vec<DeviceCredential>> {
        let state = self.state.read().await;
        let mut devices: Vec<DeviceCredential> = state
            .devices
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        devices.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(devices)
    }

    async fn upsert(&self, credential: NewDeviceCredential) -> AppResult<DeviceCredential> {
        let mut state = self.state.write().await;
        let device = match state.devices.get(&credential.endpoint) {
            Some(existing) => DeviceCredential {
                user_id: credential.user_id,
                p256dh: credential.p256dh,
                auth: credential.auth,
                ..existing.clone()
            },
            None => DeviceCredential {
                id: Uuid::now_v7(),
                user_id: credential.user_id,
                endpoint: credential.endpoint,
                p256dh: credential.p256dh,
                auth: credential.auth,
                created_at: Utc::now(),
            },
        };
        state.devices.insert(device.endpoint.clone(), device.clone());
        Ok(device)
    }

    async fn remove(&self, user_id: Uuid, endpoint: &str) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .devices
            .get(endpoint)
            .is_some_and(|d| d.user_id == user_id);
        if owned {
            state.devices.remove(endpoint);
        }
        Ok(owned)
    }
}
