//! Device registry trait.

use async_trait::async_trait;
use torchi_entity::device::{DeviceCredential, NewDeviceCredential};
use uuid::Uuid;

use crate::result::AppResult;

/// Stores the push credentials of each user's browsers.
#[async_trait]
pub trait DeviceRegistry: Send + Sync + 'static {
    /// All credentials of a user, oldest first.
    async fn devices_of(&self, user_id: Uuid) -> AppResult<Vec<DeviceCredential>>;

    /// Insert a credential, or replace owner and keys if the push URL exists.
    async fn upsert(&self, credential: NewDeviceCredential) -> AppResult<DeviceCredential>;

    /// Remove the credential with this push URL owned by `user_id`.
    async fn remove(&self, user_id: Uuid, endpoint: &str) -> AppResult<bool>;
}
