//! Endpoint management handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use crate::dto::request::CreateEndpointRequest;
use crate::dto::response::{EndpointResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /endpoints
pub async fn list_endpoints(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<EndpointResponse>>, ApiError> {
    let endpoints = state.endpoint_service.list(&auth).await?;
    Ok(Json(
        endpoints.into_iter().map(EndpointResponse::from).collect(),
    ))
}

/// POST /endpoints
pub async fn create_endpoint(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateEndpointRequest>,
) -> Result<(StatusCode, Json<EndpointResponse>), ApiError> {
    req.validate()?;
    let endpoint = state
        .endpoint_service
        .create(&auth, &req.service_name)
        .await?;
    Ok((StatusCode::CREATED, Json(endpoint.into())))
}

/// DELETE /endpoints/{token}
pub async fn delete_endpoint(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.endpoint_service.remove(&auth, &token).await?;
    Ok(Json(MessageResponse::new("Endpoint deleted")))
}

/// PUT /endpoints/{token}/mute
pub async fn mute_endpoint(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<EndpointResponse>, ApiError> {
    let endpoint = state.endpoint_service.mute(&auth, &token).await?;
    Ok(Json(endpoint.into()))
}

/// PUT /endpoints/{token}/unmute
pub async fn unmute_endpoint(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<EndpointResponse>, ApiError> {
    let endpoint = state.endpoint_service.unmute(&auth, &token).await?;
    Ok(Json(endpoint.into()))
}
