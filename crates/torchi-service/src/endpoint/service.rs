//! Endpoint creation, listing, removal, and muting.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use torchi_core::error::{AppError, ErrorKind};
use torchi_core::traits::EndpointDirectory;
use torchi_entity::endpoint::Endpoint;

use super::token::generate_token;
use crate::context::RequestContext;

/// Attempts at finding an unused token before giving up.
const MAX_TOKEN_ATTEMPTS: usize = 5;

/// Manages the caller's endpoints.
#[derive(Clone)]
pub struct EndpointService {
    endpoints: Arc<dyn EndpointDirectory>,
}

impl EndpointService {
    /// Creates a new endpoint service.
    pub fn new(endpoints: Arc<dyn EndpointDirectory>) -> Self {
        Self { endpoints }
    }

    /// Create an endpoint named `name` with a fresh token.
    pub async fn create(&self, ctx: &RequestContext, name: &str) -> Result<Endpoint, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Endpoint name must not be empty"));
        }

        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            match self
                .endpoints
                .insert(ctx.user_id, name, &generate_token())
                .await
            {
                Ok(endpoint) => {
                    info!(user_id = %ctx.user_id, endpoint_id = %endpoint.id, "Endpoint created");
                    return Ok(endpoint);
                }
                Err(err) if err.kind == ErrorKind::Conflict => {
                    warn!(attempt, "Endpoint token collision, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(AppError::conflict(
            "Could not allocate a unique endpoint token",
        ))
    }

    /// The caller's endpoints, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Endpoint>, AppError> {
        self.endpoints.list_by_user(ctx.user_id).await
    }

    /// Delete one of the caller's endpoints.
    pub async fn remove(&self, ctx: &RequestContext, token: &str) -> Result<(), AppError> {
        if !self.endpoints.remove_by_token(token, ctx.user_id).await? {
            return Err(AppError::not_found("Endpoint not found"));
        }
        info!(user_id = %ctx.user_id, "Endpoint removed");
        Ok(())
    }

    /// Stop pushes through an endpoint; dispatches are still recorded.
    pub async fn mute(&self, ctx: &RequestContext, token: &str) -> Result<Endpoint, AppError> {
        self.endpoints
            .set_muted(token, ctx.user_id, Some(Utc::now()))
            .await?
            .ok_or_else(|| AppError::not_found("Endpoint not found"))
    }

    /// Resume pushes through an endpoint.
    pub async fn unmute(&self, ctx: &RequestContext, token: &str) -> Result<Endpoint, AppError> {
        self.endpoints
            .set_muted(token, ctx.user_id, None)
            .await?
            .ok_or_else(|| AppError::not_found("Endpoint not found"))
    }
}

impl std::fmt::Debug for EndpointService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointService").finish_non_exhaustive()
    }
}
