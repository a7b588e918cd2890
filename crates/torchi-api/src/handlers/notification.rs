//! Notification history handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use torchi_core::types::CursorPage;

use crate::dto::request::ReadUntilRequest;
use crate::dto::response::{CountResponse, MessageResponse, NotificationResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, CursorParams};
use crate::state::AppState;

/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<CursorParams>,
) -> Result<Json<CursorPage<NotificationResponse>>, ApiError> {
    let page = state
        .notification_service
        .list(&auth, params.into_cursor_request())
        .await?;
    Ok(Json(page.map(NotificationResponse::from)))
}

/// POST /notifications/read-until
pub async fn read_until(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ReadUntilRequest>,
) -> Result<Json<CountResponse>, ApiError> {
    let updated = state
        .notification_service
        .mark_read_until(&auth, req.last_id)
        .await?;
    Ok(Json(CountResponse { updated }))
}

/// DELETE /notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.notification_service.delete(&auth, id).await?;
    Ok(Json(MessageResponse::new("Notification deleted")))
}
