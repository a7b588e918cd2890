//! Endpoint directory trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use torchi_entity::endpoint::Endpoint;
use uuid::Uuid;

use crate::result::AppResult;

/// Maps public endpoint tokens to their owner and mute state.
#[async_trait]
pub trait EndpointDirectory: Send + Sync + 'static {
    /// Look up an endpoint by token. Unknown tokens yield `None`.
    async fn resolve(&self, token: &str) -> AppResult<Option<Endpoint>>;

    /// Insert a new endpoint.
    ///
    /// Fails with `Conflict` when the token is already taken.
    async fn insert(&self, user_id: Uuid, name: &str, token: &str) -> AppResult<Endpoint>;

    /// List a user's endpoints, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Endpoint>>;

    /// Remove an endpoint owned by `user_id`. Returns whether a row was removed.
    async fn remove_by_token(&self, token: &str, user_id: Uuid) -> AppResult<bool>;

    /// Set or clear the mute timestamp of an endpoint owned by `user_id`.
    async fn set_muted(
        &self,
        token: &str,
        user_id: Uuid,
        disabled_at: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Endpoint>>;
}
