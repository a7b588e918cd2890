//! Browser push subscription handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use crate::dto::request::{SubscribeRequest, UnsubscribeRequest};
use crate::dto::response::{SubscriptionResponse, UnsubscribeResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SubscriptionResponse>>, ApiError> {
    let devices = state.subscription_service.list(&auth).await?;
    Ok(Json(
        devices.into_iter().map(SubscriptionResponse::from).collect(),
    ))
}

/// POST /subscriptions
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    req.validate()?;
    let device = state
        .subscription_service
        .subscribe(&auth, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(device.into())))
}

/// POST /subscriptions/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UnsubscribeRequest>,
) -> Result<Json<UnsubscribeResponse>, ApiError> {
    req.validate()?;
    let removed = state
        .subscription_service
        .unsubscribe(&auth, &req.endpoint)
        .await?;
    Ok(Json(UnsubscribeResponse { removed }))
}
